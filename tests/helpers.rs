// Shared test helpers for dispatcher and tracking tests.
//
// Each test file includes this module with `mod helpers;`.

use std::time::Duration;

use kontagent::{AnalyticsInterface, Config, Dispatcher};
use wiremock::MockServer;

/// Interface pointed at the mock server with API key `K`.
#[allow(dead_code)] // Used by other test files
pub fn interface_for(server: &MockServer) -> AnalyticsInterface {
    AnalyticsInterface::new(server.uri(), "K")
}

/// Dispatcher with default settings (no timeout).
#[allow(dead_code)]
pub fn dispatcher() -> Dispatcher {
    Dispatcher::new(&Config::default()).expect("Failed to build dispatcher")
}

/// Address of a local port with nothing listening on it.
#[allow(dead_code)]
pub fn closed_port() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    addr.to_string()
}

/// Polls `cond` every 25ms for up to 5 seconds.
#[allow(dead_code)]
pub async fn eventually(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    cond()
}

/// Blocking variant of `eventually` for tests that run outside a runtime.
#[allow(dead_code)]
pub fn wait_blocking(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    cond()
}

/// Waits until the mock server has received `count` requests.
#[allow(dead_code)]
pub async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
    for _ in 0..200 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    server.received_requests().await.unwrap_or_default()
}
