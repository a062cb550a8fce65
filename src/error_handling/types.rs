//! Error type definitions.
//!
//! This module defines the error types returned by the library and the
//! categories used to count failed deliveries.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error building a Tokio runtime for sends made outside one.
    #[error("Runtime initialization error: {0}")]
    RuntimeError(#[from] std::io::Error),

    /// A required setting was not present in the environment.
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    /// A setting was present but could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidSetting {
        /// Name of the environment variable.
        name: &'static str,
        /// The raw value that was rejected.
        value: String,
    },
}

/// Errors raised while building, encoding or sending tracking queries.
#[derive(Error, Debug)]
pub enum TrackingError {
    /// Empty or missing builder input (message type, API key, required field).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed query string under strict decoding.
    #[error("Format error: {0}")]
    Format(String),

    /// Connection, DNS or timeout failure while talking to the API server.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),

    /// A shared resource (HTTP client, runtime) could not be set up.
    #[error(transparent)]
    Initialization(#[from] InitializationError),
}

/// Categories of delivery failures.
///
/// Used to count why fire-and-forget sends failed, since those failures are
/// never returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestRequestError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestRequestError => "HTTP request error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
        }
    }
}
