//! Analytics event builders.
//!
//! One method per event type on `AnalyticsInterface`. Each maps a business
//! operation onto `construct_query` with its fixed message code and wire
//! keys. Absent optional fields never reach the query string.
//!
//! Recipient lists are sent as a single comma-joined `r` value; an empty
//! list omits `r` altogether.

mod types;

pub use types::{
    ApplicationAdded, ClickResponse, EmailResponse, EmailSent, FeedPost, InviteSent, MessageType,
    NotificationSent, PageRequest, UndirectedClick, UserInfo,
};

use crate::codec::join_list;
use crate::error_handling::TrackingError;
use crate::query::{AnalyticsInterface, QueryDescriptor};
use crate::tag::generate_long_tag;

fn require(field: &str, value: &str) -> Result<(), TrackingError> {
    if value.trim().is_empty() {
        return Err(TrackingError::Configuration(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

impl AnalyticsInterface {
    fn message(
        &self,
        message_type: MessageType,
        params: impl IntoIterator<Item = (&'static str, Option<String>)>,
    ) -> Result<QueryDescriptor, TrackingError> {
        self.construct_query(message_type.as_str(), params)
    }

    /// User information (`cpu`).
    pub fn user_info(&self, event: &UserInfo) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        self.message(
            MessageType::UserInfo,
            [
                ("s", Some(event.uid.clone())),
                ("b", event.birth_year.map(|y| y.to_string())),
                ("g", event.gender.clone()),
                ("ly", event.city.clone()),
                ("lc", event.country.clone()),
                ("ls", event.state.clone()),
                ("lp", event.postal.clone()),
                ("f", event.friends.map(|f| f.to_string())),
            ],
        )
    }

    /// Application added (`apa`).
    pub fn application_added(
        &self,
        event: &ApplicationAdded,
    ) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        self.message(
            MessageType::ApplicationAdded,
            [
                ("s", Some(event.uid.clone())),
                ("u", event.tracking_tag.clone()),
                ("su", event.short_tracking_tag.clone()),
            ],
        )
    }

    /// Application removed (`apr`).
    pub fn application_removed(&self, uid: &str) -> Result<QueryDescriptor, TrackingError> {
        require("uid", uid)?;
        self.message(MessageType::ApplicationRemoved, [("s", Some(uid.to_string()))])
    }

    /// Page request (`pgr`).
    pub fn page_request(&self, event: &PageRequest) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        require("uri", &event.uri)?;
        self.message(
            MessageType::PageRequest,
            [
                ("s", Some(event.uid.clone())),
                ("u", Some(event.uri.clone())),
                ("ip", event.requester_ip.clone()),
            ],
        )
    }

    /// Invite sent (`ins`). Generates a long tracking tag if none is given.
    pub fn invite_sent(&self, event: &InviteSent) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        let tracking_tag = event
            .tracking_tag
            .clone()
            .unwrap_or_else(generate_long_tag);
        self.message(
            MessageType::InviteSent,
            [
                ("s", Some(event.uid.clone())),
                ("r", join_list(&event.recipients)),
                ("u", Some(tracking_tag)),
                ("t", event.template_id.clone()),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
                ("st3", event.subtype3.clone()),
            ],
        )
    }

    /// Notification sent (`nts`).
    pub fn notification_sent(
        &self,
        event: &NotificationSent,
    ) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        require("tracking_tag", &event.tracking_tag)?;
        self.message(
            MessageType::NotificationSent,
            [
                ("s", Some(event.uid.clone())),
                ("r", join_list(&event.recipients)),
                ("u", Some(event.tracking_tag.clone())),
                ("t", event.template_id.clone()),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
            ],
        )
    }

    /// Email notification sent (`nes`).
    pub fn email_sent(&self, event: &EmailSent) -> Result<QueryDescriptor, TrackingError> {
        require("sender", &event.sender)?;
        require("tracking_tag", &event.tracking_tag)?;
        self.message(
            MessageType::EmailSent,
            [
                ("s", Some(event.sender.clone())),
                ("r", join_list(&event.recipients)),
                ("u", Some(event.tracking_tag.clone())),
                ("t", event.template_id.clone()),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
            ],
        )
    }

    /// Feed post (`fdp`).
    pub fn feed_post(&self, event: &FeedPost) -> Result<QueryDescriptor, TrackingError> {
        require("poster", &event.poster)?;
        self.message(
            MessageType::FeedPost,
            [
                ("s", Some(event.poster.clone())),
                ("t", event.template_id.clone()),
                ("pt", event.post_type.clone()),
                ("tu", Some(MessageType::FeedPost.to_string())),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
            ],
        )
    }

    /// Invite click response (`inr`).
    pub fn invite_response(&self, event: &ClickResponse) -> Result<QueryDescriptor, TrackingError> {
        self.click_response(MessageType::InviteResponse, event)
    }

    /// Notification click response (`ntr`).
    pub fn notification_response(
        &self,
        event: &ClickResponse,
    ) -> Result<QueryDescriptor, TrackingError> {
        self.click_response(MessageType::NotificationResponse, event)
    }

    fn click_response(
        &self,
        message_type: MessageType,
        event: &ClickResponse,
    ) -> Result<QueryDescriptor, TrackingError> {
        require("tracking_tag", &event.tracking_tag)?;
        self.message(
            message_type,
            [
                ("r", event.recipient_id.clone()),
                ("i", Some(flag(event.installed))),
                ("t", event.template_id.clone()),
                ("u", Some(event.tracking_tag.clone())),
                ("tu", Some(message_type.to_string())),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
                ("st3", event.subtype3.clone()),
            ],
        )
    }

    /// Email click response (`nei`).
    pub fn email_response(&self, event: &EmailResponse) -> Result<QueryDescriptor, TrackingError> {
        require("tracking_tag", &event.tracking_tag)?;
        self.message(
            MessageType::EmailResponse,
            [
                ("r", event.recipient_id.clone()),
                ("i", Some(flag(event.installed))),
                ("u", Some(event.tracking_tag.clone())),
                ("tu", Some(MessageType::EmailResponse.to_string())),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
                ("st3", event.subtype3.clone()),
            ],
        )
    }

    /// Undirected communication click (`ucc`).
    pub fn ucc(&self, event: &UndirectedClick) -> Result<QueryDescriptor, TrackingError> {
        require("uid", &event.uid)?;
        require("link_type", &event.link_type)?;
        self.message(
            MessageType::UndirectedClick,
            [
                ("s", Some(event.uid.clone())),
                ("tu", Some(event.link_type.clone())),
                ("i", Some(flag(event.installed))),
                ("su", event.short_tracking_tag.clone()),
                ("st1", event.subtype1.clone()),
                ("st2", event.subtype2.clone()),
                ("st3", event.subtype3.clone()),
            ],
        )
    }

    /// Goal count (`gci`). The value is sent under `gc{goal_number}`.
    pub fn goal_count(
        &self,
        uid: &str,
        goal_number: u32,
        goal_value: &str,
    ) -> Result<QueryDescriptor, TrackingError> {
        require("uid", uid)?;
        self.construct_query(
            MessageType::GoalCount.as_str(),
            [
                ("s".to_string(), Some(uid.to_string())),
                (format!("gc{goal_number}"), Some(goal_value.to_string())),
            ],
        )
    }
}
