//! Library configuration and constants.
//!
//! This module provides:
//! - Default values and fixed wire constants
//! - The `Config` struct and its environment loader
//! - Logging enums shared with the CLI

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
