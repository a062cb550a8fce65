//! Shared resource setup.
//!
//! - HTTP client for the dispatcher
//! - Logger for binaries and tests

mod client;
mod logger;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;
