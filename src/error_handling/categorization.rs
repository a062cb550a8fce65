//! Error categorization.
//!
//! Maps transport failures onto the `ErrorType` buckets counted by
//! `DeliveryStats`.

use super::stats::DeliveryStats;
use super::types::{ErrorType, TrackingError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// The API server's status code is not inspected: the response body is
/// opaque to this library, so only transport-level failures are errors.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Categorizes any `TrackingError` raised by a send.
///
/// Non-network errors cannot come out of a send in practice; they are
/// counted as `HttpRequestOtherError` so nothing goes uncounted.
pub fn categorize_tracking_error(error: &TrackingError) -> ErrorType {
    match error {
        TrackingError::Network(e) => categorize_reqwest_error(e),
        _ => ErrorType::HttpRequestOtherError,
    }
}

/// Records a failed delivery in `stats` and returns the category used.
pub fn update_error_stats(stats: &DeliveryStats, error: &TrackingError) -> ErrorType {
    let error_type = categorize_tracking_error(error);
    stats.increment_error(error_type);
    error_type
}
