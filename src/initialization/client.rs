//! HTTP client initialization.

use reqwest::ClientBuilder;

use crate::config::Config;

/// Builds the HTTP client used to reach the API server.
///
/// Sets the configured User-Agent. A timeout is only applied when
/// `config.request_timeout` is set; otherwise reqwest's defaults apply.
///
/// Idle connections are not pooled: every send opens and closes its own
/// connection, which also keeps the client usable from the short-lived
/// runtimes that serve sends made outside Tokio.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .pool_max_idle_per_host(0);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
