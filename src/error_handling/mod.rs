//! Error handling and delivery statistics.
//!
//! This module provides:
//! - Error type definitions (`TrackingError`, `InitializationError`)
//! - Categorization of transport failures
//! - Delivery statistics for fire-and-forget sends
//!
//! Build-time errors (bad parameters) always surface to the caller.
//! Dispatch-time errors surface only for synchronous sends; detached sends
//! only ever show up in `DeliveryStats` and the log.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_tracking_error, update_error_stats};
pub use stats::DeliveryStats;
pub use types::{ErrorType, InitializationError, TrackingError};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_delivery_stats_initialization() {
        let stats = DeliveryStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        assert_eq!(stats.delivered(), 0);
        assert_eq!(stats.total_errors(), 0);
    }

    #[test]
    fn test_delivery_stats_increment() {
        let stats = DeliveryStats::new();
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_delivered();

        assert_eq!(stats.get_error_count(ErrorType::HttpRequestTimeoutError), 2);
        assert_eq!(stats.get_error_count(ErrorType::HttpRequestConnectError), 0);
        assert_eq!(stats.delivered(), 1);
        assert_eq!(stats.total_errors(), 2);
    }

    #[test]
    fn test_error_type_display_is_human_readable() {
        for error_type in ErrorType::iter() {
            let text = error_type.to_string();
            assert!(text.starts_with("HTTP request"), "{text}");
        }
    }

    #[test]
    fn test_tracking_error_messages() {
        let err = TrackingError::Configuration("message type must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: message type must not be empty"
        );

        let err = TrackingError::Format("bad query field: \"abc\"".into());
        assert!(err.to_string().starts_with("Format error"));
    }

    #[test]
    fn test_runtime_error_is_initialization_error() {
        let io_err = std::io::Error::other("no threads left");
        let err: TrackingError = InitializationError::from(io_err).into();
        assert!(matches!(
            err,
            TrackingError::Initialization(InitializationError::RuntimeError(_))
        ));
        assert_eq!(err.to_string(), "Runtime initialization error: no threads left");
    }

    #[test]
    fn test_initialization_error_messages() {
        let err = InitializationError::MissingSetting("KONTAGENT_API_KEY");
        assert_eq!(
            err.to_string(),
            "Missing required setting: KONTAGENT_API_KEY"
        );

        let err = InitializationError::InvalidSetting {
            name: "KONTAGENT_AUTO_REDIRECT",
            value: "maybe".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for KONTAGENT_AUTO_REDIRECT: \"maybe\""
        );
    }
}
