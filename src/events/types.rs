//! Event argument types.
//!
//! One struct per analytics event. Required string fields must be non-blank;
//! every `Option` field is omitted from the query when `None`.

use strum_macros::EnumIter as EnumIterMacro;

/// Wire codes identifying each analytics message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum MessageType {
    UserInfo,
    ApplicationAdded,
    ApplicationRemoved,
    PageRequest,
    InviteSent,
    NotificationSent,
    EmailSent,
    FeedPost,
    InviteResponse,
    NotificationResponse,
    EmailResponse,
    UndirectedClick,
    GoalCount,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::UserInfo => "cpu",
            MessageType::ApplicationAdded => "apa",
            MessageType::ApplicationRemoved => "apr",
            MessageType::PageRequest => "pgr",
            MessageType::InviteSent => "ins",
            MessageType::NotificationSent => "nts",
            MessageType::EmailSent => "nes",
            MessageType::FeedPost => "fdp",
            MessageType::InviteResponse => "inr",
            MessageType::NotificationResponse => "ntr",
            MessageType::EmailResponse => "nei",
            MessageType::UndirectedClick => "ucc",
            MessageType::GoalCount => "gci",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User information (`cpu`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserInfo {
    pub uid: String,
    pub birth_year: Option<u16>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    /// Number of friends.
    pub friends: Option<u32>,
}

/// Application added (`apa`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationAdded {
    pub uid: String,
    pub tracking_tag: Option<String>,
    pub short_tracking_tag: Option<String>,
}

/// Page request (`pgr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub uid: String,
    pub uri: String,
    pub requester_ip: Option<String>,
}

/// Invite sent (`ins`).
///
/// A long tracking tag is generated when `tracking_tag` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteSent {
    pub uid: String,
    pub recipients: Vec<String>,
    pub tracking_tag: Option<String>,
    pub template_id: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
    pub subtype3: Option<String>,
}

/// Notification sent (`nts`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationSent {
    pub uid: String,
    pub recipients: Vec<String>,
    pub tracking_tag: String,
    pub template_id: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
}

/// Email notification sent (`nes`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSent {
    pub sender: String,
    pub recipients: Vec<String>,
    pub tracking_tag: String,
    pub template_id: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
}

/// Feed post (`fdp`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPost {
    pub poster: String,
    pub template_id: Option<String>,
    pub post_type: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
}

/// Click on an invite (`inr`) or notification (`ntr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickResponse {
    /// Whether the clicking user already has the application installed.
    pub installed: bool,
    pub tracking_tag: String,
    pub template_id: Option<String>,
    pub recipient_id: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
    pub subtype3: Option<String>,
}

/// Click on an email link (`nei`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailResponse {
    pub installed: bool,
    pub tracking_tag: String,
    pub recipient_id: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
    pub subtype3: Option<String>,
}

/// Undirected communication click (`ucc`), e.g. from an ad or profile box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndirectedClick {
    pub uid: String,
    /// Link type reported as `tu` (`ad`, `partner`, `profile`, ...).
    pub link_type: String,
    pub installed: bool,
    pub short_tracking_tag: Option<String>,
    pub subtype1: Option<String>,
    pub subtype2: Option<String>,
    pub subtype3: Option<String>,
}
