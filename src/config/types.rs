//! Configuration types.
//!
//! This module defines the library configuration and the logging enums
//! shared with the command-line interface.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_API_VERSION, DEFAULT_AUTO_REDIRECT, DEFAULT_USER_AGENT, ENV_API_KEY,
    ENV_API_SERVER, ENV_API_VERSION, ENV_AUTO_REDIRECT, ENV_TIMEOUT_SECS,
};
use crate::error_handling::InitializationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration.
///
/// Read-only after construction; the query builder and dispatcher only ever
/// borrow it, so one value can back any number of concurrent calls.
///
/// # Examples
///
/// ```
/// use kontagent::Config;
///
/// let config = Config {
///     api_server: "api.geo.kontagent.net".to_string(),
///     api_key: "0123456789abcdef".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.api_version, "v1");
/// assert!(config.auto_redirect);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host, optionally with port or scheme (e.g. `api.geo.kontagent.net`)
    pub api_server: String,

    /// API key embedded in every query path
    pub api_key: String,

    /// API version segment (default `v1`)
    pub api_version: String,

    /// Redirect to the stripped URL after recording a click
    pub auto_redirect: bool,

    /// Per-request timeout; `None` leaves reqwest's defaults in place
    pub request_timeout: Option<Duration>,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_server: String::new(),
            api_key: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            auto_redirect: DEFAULT_AUTO_REDIRECT,
            request_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Builds a configuration from `KONTAGENT_*` environment variables.
    ///
    /// `KONTAGENT_API_SERVER` and `KONTAGENT_API_KEY` are required.
    /// `KONTAGENT_API_VERSION`, `KONTAGENT_AUTO_REDIRECT` and
    /// `KONTAGENT_TIMEOUT_SECS` fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::MissingSetting` when a required variable
    /// is unset or blank, and `InitializationError::InvalidSetting` when a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, InitializationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Same rules as [`Config::from_env`], without touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InitializationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(InitializationError::MissingSetting(name))
        };

        let api_server = required(ENV_API_SERVER)?;
        let api_key = required(ENV_API_KEY)?;

        let api_version = lookup(ENV_API_VERSION)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let auto_redirect = match lookup(ENV_AUTO_REDIRECT) {
            Some(raw) => parse_bool(&raw).ok_or(InitializationError::InvalidSetting {
                name: ENV_AUTO_REDIRECT,
                value: raw,
            })?,
            None => DEFAULT_AUTO_REDIRECT,
        };

        let request_timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| InitializationError::InvalidSetting {
                        name: ENV_TIMEOUT_SECS,
                        value: raw.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_server,
            api_key,
            api_version,
            auto_redirect,
            request_timeout,
            ..Default::default()
        })
    }
}

/// Parses the boolean spellings accepted in environment variables.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
