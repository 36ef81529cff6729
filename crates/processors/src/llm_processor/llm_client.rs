//! Client for a self-hosted LLM endpoint (`POST /generate`)

use nifikit_host_api::{HostEnvironment, HttpClient, HttpError, ImportError, ModuleExports};
use serde_json::{json, Value};
use std::time::Duration;

pub const MODULE: &str = "llm_processor.llm_client";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_NEW_TOKENS: u32 = 100;

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest<'a> {
    pub host: &'a str,
    pub port: &'a str,
    pub system_prompt: &'a str,
    pub temperature: f64,
    pub user_text: &'a str,
}

impl GenerateRequest<'_> {
    pub fn url(&self) -> String {
        format!("http://{}:{}/generate", self.host, self.port)
    }

    /// `system_prompt` and `temperature` are sent alongside the prompt for
    /// servers that understand them.
    pub fn payload(&self) -> Value {
        json!({
            "prompt": self.user_text,
            "max_new_tokens": MAX_NEW_TOKENS,
            "system_prompt": self.system_prompt,
            "temperature": self.temperature,
        })
    }
}

/// Pull generated text out of a response, trying the common shapes first
pub fn extract_text(data: &Value) -> String {
    fn text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    if let Some(object) = data.as_object() {
        if let Some(response) = object.get("response") {
            return text(response);
        }
        if let Some(generated) = object.get("generated_text") {
            return text(generated);
        }
        let first = object
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .and_then(|first| first.get("text"));
        if let Some(first) = first {
            return text(first);
        }
    }

    data.to_string()
}

/// Send `request` and return the generated text
pub fn call_llm(http: &dyn HttpClient, request: &GenerateRequest<'_>) -> Result<String, HttpError> {
    let url = request.url();
    tracing::debug!(%url, temperature = request.temperature, "calling llm endpoint");
    let data = http.post_json(&url, &[], &request.payload(), REQUEST_TIMEOUT)?;
    Ok(extract_text(&data))
}

pub fn load(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    Ok(ModuleExports::new())
}
