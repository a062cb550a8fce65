//! Query construction.
//!
//! An `AnalyticsInterface` holds the API server, key and version, and turns a
//! message type plus parameters into a `QueryDescriptor` of the form
//! `/api/{version}/{key}/{message_type}/?{params}`. Nothing here touches the
//! network.

use log::debug;
use serde::Serialize;

use crate::codec;
use crate::config::{Config, DEFAULT_API_VERSION};
use crate::error_handling::TrackingError;

/// A single request to the analytics API, ready to be sent.
///
/// Immutable once built; the dispatcher only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    path: String,
    target_server: String,
    message_type: Option<String>,
}

impl QueryDescriptor {
    /// Wraps an already-formatted path.
    pub fn new(path: impl Into<String>, target_server: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_server: target_server.into(),
            message_type: None,
        }
    }

    /// Path and query string, e.g. `/api/v1/KEY/apr/?s=42`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Server the query is sent to.
    pub fn target_server(&self) -> &str {
        &self.target_server
    }

    /// Message type code (`ins`, `apr`, ...), when known.
    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }

    /// Decodes the query-string part of the path.
    pub fn params(&self) -> codec::QueryMap {
        let query = self.path.split_once('?').map(|(_, q)| q).unwrap_or("");
        codec::decode(query, true)
    }
}

/// Factory for `QueryDescriptor`s bound to one API server and key.
///
/// # Examples
///
/// ```
/// use kontagent::AnalyticsInterface;
///
/// let api = AnalyticsInterface::new("api.x.net", "K");
/// let query = api.construct_query("apr", [("s", Some("42"))]).unwrap();
/// assert_eq!(query.path(), "/api/v1/K/apr/?s=42");
/// assert_eq!(query.target_server(), "api.x.net");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsInterface {
    server: String,
    key: String,
    version: String,
}

impl AnalyticsInterface {
    /// Creates an interface using API version `v1`.
    pub fn new(api_server: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_version(api_server, api_key, DEFAULT_API_VERSION)
    }

    pub fn with_version(
        api_server: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            server: api_server.into(),
            key: api_key.into(),
            version: api_version.into(),
        }
    }

    /// Creates an interface from library configuration.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Configuration` if the server, key or version
    /// is blank.
    pub fn from_config(config: &Config) -> Result<Self, TrackingError> {
        for (name, value) in [
            ("api_server", &config.api_server),
            ("api_key", &config.api_key),
            ("api_version", &config.api_version),
        ] {
            if value.trim().is_empty() {
                return Err(TrackingError::Configuration(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(Self::with_version(
            config.api_server.trim(),
            config.api_key.trim(),
            config.api_version.trim(),
        ))
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Builds a query for `message_type`, dropping absent parameters.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Configuration` if `message_type` is empty.
    pub fn construct_query<K, V>(
        &self,
        message_type: &str,
        params: impl IntoIterator<Item = (K, Option<V>)>,
    ) -> Result<QueryDescriptor, TrackingError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut query =
            construct_query(&self.server, &self.key, &self.version, message_type, params)?;
        query.message_type = Some(message_type.to_string());
        Ok(query)
    }
}

/// Builds a query without an `AnalyticsInterface`.
///
/// The returned descriptor carries no message type.
///
/// # Errors
///
/// Returns `TrackingError::Configuration` if `message_type` is empty.
pub fn construct_query<K, V>(
    api_server: &str,
    api_key: &str,
    api_version: &str,
    message_type: &str,
    params: impl IntoIterator<Item = (K, Option<V>)>,
) -> Result<QueryDescriptor, TrackingError>
where
    K: Into<String>,
    V: Into<String>,
{
    if message_type.is_empty() {
        return Err(TrackingError::Configuration(
            "message type must not be empty".to_string(),
        ));
    }

    let path = format!(
        "/api/{}/{}/{}/?{}",
        api_version,
        api_key,
        message_type,
        codec::encode(params)
    );
    debug!("Built {message_type} query for {api_server}: {path}");

    Ok(QueryDescriptor::new(path, api_server))
}
