//! Outbound HTTP capability
//!
//! Processors that talk to remote services obtain their client from the host
//! environment rather than opening connections themselves. The stand-in
//! environment hands out `OfflineHttpClient`, so nothing loaded under it can
//! reach the network.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("network access is disabled in this host environment (POST {0})")]
    Offline(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Blocking JSON-over-HTTP client
pub trait HttpClient: Send + Sync {
    /// POST `body` as JSON with extra `headers` and decode the JSON response
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, HttpError>;
}

/// Client that refuses every request
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineHttpClient;

impl HttpClient for OfflineHttpClient {
    fn post_json(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
        _body: &Value,
        _timeout: Duration,
    ) -> Result<Value, HttpError> {
        tracing::debug!(url, "refusing outbound request in offline host environment");
        Err(HttpError::Offline(url.to_string()))
    }
}
