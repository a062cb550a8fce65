//! kontagent library: client for the Kontagent analytics REST API
//!
//! This library builds tracking queries (`GET /api/{version}/{key}/{type}/?...`),
//! sends them synchronously or fire-and-forget, and manages the `kt_*`
//! tracking parameters carried on links through invite and notification
//! redirect chains.
//!
//! # Example
//!
//! ```no_run
//! use kontagent::events::InviteSent;
//! use kontagent::links::{append_invite_content_params, LinkParams};
//! use kontagent::{generate_long_tag, AnalyticsInterface, Config, Dispatcher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let api = AnalyticsInterface::from_config(&config)?;
//! let dispatcher = Dispatcher::new(&config)?;
//!
//! let tag = generate_long_tag();
//! let link = append_invite_content_params(
//!     "http://apps.facebook.com/yourapp/",
//!     &tag,
//!     &LinkParams::default(),
//! );
//! println!("invite link: {link}");
//!
//! let query = api.invite_sent(&InviteSent {
//!     uid: "42".to_string(),
//!     recipients: vec!["100".to_string(), "200".to_string()],
//!     tracking_tag: Some(tag),
//!     ..Default::default()
//! })?;
//! dispatcher.send_detached(query);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! `Dispatcher::send` is async and needs a Tokio runtime. `send_blocking` and
//! `send_detached` work from plain threads as well. Building queries and
//! rewriting links never touch the network.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error_handling;
pub mod events;
pub mod initialization;
pub mod links;
pub mod query;
pub mod tag;
pub mod tracking;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use dispatch::Dispatcher;
pub use error_handling::{DeliveryStats, ErrorType, InitializationError, TrackingError};
pub use query::{construct_query, AnalyticsInterface, QueryDescriptor};
pub use tag::{generate_long_tag, generate_short_tag};
pub use tracking::{IncomingRequest, Redirect, TrackingMiddleware};
