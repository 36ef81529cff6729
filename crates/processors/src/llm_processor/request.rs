//! Google Gemini `generateContent` request

use nifikit_host_api::{HostEnvironment, HttpClient, HttpError, ImportError, ModuleExports};
use serde_json::{json, Value};
use std::time::Duration;

pub const MODULE: &str = "llm_processor.request";

pub const MODEL: &str = "gemini-2.5-flash";

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn generate_content_url(model: &str) -> String {
    format!("{ENDPOINT}/{model}:generateContent")
}

pub fn payload(prompt: &str) -> Value {
    json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt }
                ]
            }
        ]
    })
}

/// Concatenated text parts of the first candidate; empty when there are none
pub fn response_text(body: &Value) -> String {
    body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Ask the model for a completion of `prompt`
pub fn request(http: &dyn HttpClient, prompt: &str, api_key: &str) -> Result<String, HttpError> {
    let url = generate_content_url(MODEL);
    tracing::debug!(model = MODEL, prompt_chars = prompt.chars().count(), "gemini request");
    let body = http.post_json(
        &url,
        &[(API_KEY_HEADER, api_key)],
        &payload(prompt),
        REQUEST_TIMEOUT,
    )?;
    Ok(response_text(&body))
}

pub fn load(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    Ok(ModuleExports::new())
}
