//! Live HTTP client for running processors against real endpoints
//!
//! The conformance harness never installs this; it is handed to a
//! `HostEnvironment` explicitly via `with_http_client`.

use nifikit_host_api::{HttpClient, HttpError};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Environment variable that opts back into the system proxy
pub const USE_SYSTEM_PROXY_ENV: &str = "NIFIKIT_USE_SYSTEM_PROXY";

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        let allow_system_proxy = std::env::var(USE_SYSTEM_PROXY_ENV)
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        if !allow_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, HttpError> {
        let mut request = self.client.post(url).timeout(timeout).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(|e| HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().map_err(|e| HttpError::Body {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
