//! Query delivery.
//!
//! `Dispatcher::send` issues the GET and returns the response body;
//! `send_blocking` does the same for callers outside async code.
//! `Dispatcher::send_detached` starts the same call on an independent path
//! and returns immediately: a Tokio task when a runtime is available, a
//! plain thread with its own single-threaded runtime otherwise. Detached
//! sends are best-effort: there is no pooling, queueing, retry or ordering
//! between them, nothing can await or cancel them, and their failures are
//! only logged and counted in `DeliveryStats`. Neither the task nor the
//! thread keeps the process alive, so pending sends may be lost at exit.

use std::sync::Arc;
use std::thread;

use log::{debug, warn};
use tokio::runtime::{Builder, Handle, Runtime};

use crate::config::Config;
use crate::error_handling::{
    categorize_tracking_error, update_error_stats, DeliveryStats, ErrorType,
    InitializationError, TrackingError,
};
use crate::initialization::init_client;
use crate::query::QueryDescriptor;

/// Sends queries to the analytics API server.
///
/// Cheap to clone; clones share the HTTP client and the statistics.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    stats: Arc<DeliveryStats>,
}

impl Dispatcher {
    /// Creates a dispatcher with a client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::with_client(init_client(config)?))
    }

    /// Creates a dispatcher around an existing client.
    ///
    /// Sends made outside a Tokio runtime each run on a short-lived runtime,
    /// so a supplied client should not keep idle pooled connections (see
    /// `reqwest::ClientBuilder::pool_max_idle_per_host`).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            stats: Arc::new(DeliveryStats::new()),
        }
    }

    /// Delivery counters for every send made through this dispatcher.
    pub fn stats(&self) -> Arc<DeliveryStats> {
        Arc::clone(&self.stats)
    }

    /// Sends `query` and returns the full response body.
    ///
    /// The status code is not checked; the body is opaque to this library.
    /// No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Network` on connection, DNS, timeout or body
    /// read failure.
    pub async fn send(&self, query: &QueryDescriptor) -> Result<String, TrackingError> {
        match self.deliver(query).await {
            Ok(body) => {
                self.stats.increment_delivered();
                Ok(body)
            }
            Err(e) => {
                update_error_stats(&self.stats, &e);
                Err(e)
            }
        }
    }

    /// Sends `query`, blocking the calling thread until the round trip ends.
    ///
    /// Usable from any thread. Inside a Tokio runtime the request runs on a
    /// scoped helper thread, since a runtime cannot be blocked on from
    /// within another.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::send`], plus `TrackingError::Initialization`
    /// if the helper runtime cannot be started.
    pub fn send_blocking(&self, query: &QueryDescriptor) -> Result<String, TrackingError> {
        if Handle::try_current().is_err() {
            return self.block_on_send(query);
        }
        thread::scope(|scope| {
            scope
                .spawn(|| self.block_on_send(query))
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
        })
    }

    fn block_on_send(&self, query: &QueryDescriptor) -> Result<String, TrackingError> {
        let runtime = single_thread_runtime().map_err(InitializationError::from)?;
        runtime.block_on(self.send(query))
    }

    async fn deliver(&self, query: &QueryDescriptor) -> Result<String, TrackingError> {
        let url = request_url(query);
        debug!(
            "Sending {} query to {}",
            query.message_type().unwrap_or("untyped"),
            url
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("API server answered {} ({} bytes)", status, body.len());
        Ok(body)
    }

    /// Sends `query` on a detached task or thread and returns immediately.
    ///
    /// Never blocks and never reports failure to the caller. Inside a Tokio
    /// runtime the send is spawned onto it; elsewhere it gets its own thread.
    pub fn send_detached(&self, query: QueryDescriptor) {
        let dispatcher = self.clone();

        if let Ok(handle) = Handle::try_current() {
            // The JoinHandle is dropped on purpose: the task runs detached.
            handle.spawn(async move { dispatcher.send_logged(query).await });
            return;
        }

        // Not joined; process exit does not wait for it.
        let spawned = thread::Builder::new()
            .name("kontagent-send".to_string())
            .spawn(move || match single_thread_runtime() {
                Ok(runtime) => runtime.block_on(dispatcher.send_logged(query)),
                Err(e) => {
                    warn!("Cannot start runtime for detached send: {e}");
                    dispatcher
                        .stats
                        .increment_error(ErrorType::HttpRequestOtherError);
                }
            });

        if let Err(e) = spawned {
            warn!("Cannot spawn thread for detached send: {e}");
            self.stats.increment_error(ErrorType::HttpRequestOtherError);
        }
    }

    async fn send_logged(&self, query: QueryDescriptor) {
        if let Err(e) = self.send(&query).await {
            warn!(
                "Detached {} send to {} failed ({}): {}",
                query.message_type().unwrap_or("untyped"),
                query.target_server(),
                categorize_tracking_error(&e),
                e
            );
        }
    }
}

fn single_thread_runtime() -> std::io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Absolute URL for `query`.
///
/// The target server may be a bare host (`api.geo.kontagent.net`), a
/// `host:port`, or already carry a scheme; bare hosts are reached over plain
/// HTTP.
pub fn request_url(query: &QueryDescriptor) -> String {
    let server = query.target_server().trim_end_matches('/');
    if server.contains("://") {
        format!("{}{}", server, query.path())
    } else {
        format!("http://{}{}", server, query.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_bare_host() {
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", "api.x.net");
        assert_eq!(request_url(&q), "http://api.x.net/api/v1/K/apr/?s=42");
    }

    #[test]
    fn test_request_url_host_and_port() {
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", "127.0.0.1:8080");
        assert_eq!(request_url(&q), "http://127.0.0.1:8080/api/v1/K/apr/?s=42");
    }

    #[test]
    fn test_request_url_with_scheme() {
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", "https://api.x.net/");
        assert_eq!(request_url(&q), "https://api.x.net/api/v1/K/apr/?s=42");
    }

    fn closed_addr() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr.to_string()
    }

    #[test]
    fn test_send_detached_outside_runtime_still_sends() {
        let dispatcher = Dispatcher::new(&Config::default()).unwrap();
        let stats = dispatcher.stats();
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", closed_addr());

        dispatcher.send_detached(q);

        // The attempt is made on a background thread and fails to connect.
        let mut attempts = 0;
        while stats.total_errors() == 0 && attempts < 200 {
            std::thread::sleep(std::time::Duration::from_millis(25));
            attempts += 1;
        }
        assert_eq!(stats.get_error_count(ErrorType::HttpRequestConnectError), 1);
        assert_eq!(stats.get_error_count(ErrorType::HttpRequestOtherError), 0);
    }

    #[test]
    fn test_send_blocking_outside_runtime() {
        let dispatcher = Dispatcher::new(&Config::default()).unwrap();
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", closed_addr());
        let err = dispatcher.send_blocking(&q).unwrap_err();
        assert!(matches!(err, TrackingError::Network(_)));
    }

    #[tokio::test]
    async fn test_send_blocking_inside_runtime_does_not_panic() {
        let dispatcher = Dispatcher::new(&Config::default()).unwrap();
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", closed_addr());
        let err = dispatcher.send_blocking(&q).unwrap_err();
        assert!(matches!(err, TrackingError::Network(_)));
        assert_eq!(dispatcher.stats().total_errors(), 1);
    }

    #[tokio::test]
    async fn test_send_refused_connection_is_network_error() {
        let dispatcher = Dispatcher::new(&Config::default()).unwrap();
        let q = QueryDescriptor::new("/api/v1/K/apr/?s=42", closed_addr());
        let err = dispatcher.send(&q).await.unwrap_err();
        assert!(matches!(err, TrackingError::Network(_)));
        assert_eq!(
            dispatcher
                .stats()
                .get_error_count(ErrorType::HttpRequestConnectError),
            1
        );
    }
}
