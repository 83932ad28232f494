//! Shared helpers for the integration tests

#![allow(dead_code)]

use docean::api::{Client, RetryConfig};
use std::time::Duration;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// Client pointed at a mock server.
pub fn client(server: &MockServer) -> Client {
    Client::builder()
        .token(TOKEN)
        .base_url(&server.uri())
        .build()
        .expect("client should build")
}

/// Client that retries quickly, for tests that exercise the retry loop.
pub fn retrying_client(server: &MockServer, max_retries: u32) -> Client {
    Client::builder()
        .token(TOKEN)
        .base_url(&server.uri())
        .retry(RetryConfig {
            max_retries,
            wait_min: Duration::from_millis(5),
            wait_max: Duration::from_millis(20),
        })
        .build()
        .expect("client should build")
}

/// Absolute URL of `path` on the mock server, as the API puts in `links`.
pub fn page_url(server: &MockServer, path: &str, page: u32) -> String {
    format!("{}{}?page={}", server.uri(), path, page)
}
