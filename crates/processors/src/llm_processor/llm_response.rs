//! LlmResponse processor: the whole flowfile as a Gemini prompt

use super::request;
use crate::truncate;
use nifikit_host_api::relationship::{FAILURE, SUCCESS};
use nifikit_host_api::{
    FlowFile, FlowFileTransform, FlowFileTransformResult, HostEnvironment, HttpClient, HttpError,
    ImportError, ModuleExports, PluginClass, ProcessContext, Processor, ProcessorDetails,
    ProcessorError, PropertyDescriptor, Relationship,
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

pub const MODULE: &str = "llm_processor.llm_response";

/// Fallback source of the API key
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

const API_KEY: &str = "api_key";
const SYSTEM_PROMPT: &str = "system_prompt";
const RESPONSE_FORMAT: &str = "response_format";

const PROVIDER: &str = "google";
const CLIENT: &str = "google.genai";

#[derive(Debug, Error)]
enum ResponseError {
    #[error(
        "API key is missing. Set processor property 'api_key' \
         or environment variable GOOGLE_AI_API_KEY."
    )]
    MissingApiKey,

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Output format of the model text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

impl ResponseFormat {
    /// Unknown values fall back to text
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => ResponseFormat::Json,
            _ => ResponseFormat::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Text => "text",
            ResponseFormat::Json => "json",
        }
    }

    fn render(&self, text: &str) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            ResponseFormat::Text => Ok(text.as_bytes().to_vec()),
            ResponseFormat::Json => serde_json::to_vec(&json!({ "text": text })),
        }
    }
}

/// `system\n\n---\nuser`, or the user text alone without a system prompt
pub fn make_prompt(user_text: &str, system_prompt: &str) -> String {
    if system_prompt.is_empty() {
        user_text.to_string()
    } else {
        format!("{}\n\n---\n{}", system_prompt.trim(), user_text)
    }
}

fn property(context: &dyn ProcessContext, name: &str) -> String {
    context
        .property(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Sends the flowfile content to Gemini and replaces it with the answer
pub struct LlmResponse {
    http: Arc<dyn HttpClient>,
}

impl LlmResponse {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub fn class() -> PluginClass {
        PluginClass::transform(
            "LlmResponse",
            MODULE,
            "transform(self, context, flowfile)",
            Self::create,
        )
        .with_details(
            ProcessorDetails::new(
                "0.3.3",
                "Calls the Gemini model with the entire FlowFile content as the prompt.",
            )
            .with_tags(["LLM", "python", "transform", "google", "gemini", "generative ai"]),
        )
    }

    fn create(env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
        Ok(Box::new(Self::new(env.http())))
    }

    fn api_key(context: &dyn ProcessContext) -> Result<String, ResponseError> {
        let from_property = property(context, API_KEY);
        if !from_property.is_empty() {
            return Ok(from_property);
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ResponseError::MissingApiKey)
    }

    fn respond(
        &self,
        context: &dyn ProcessContext,
        data: &[u8],
    ) -> Result<(Vec<u8>, ResponseFormat), ResponseError> {
        let api_key = Self::api_key(context)?;
        let system_prompt = property(context, SYSTEM_PROMPT);
        let format = ResponseFormat::parse(&property(context, RESPONSE_FORMAT));

        let user_text = String::from_utf8_lossy(data);
        let prompt = make_prompt(&user_text, &system_prompt);

        let model_text = request::request(self.http.as_ref(), &prompt, &api_key)?;
        Ok((format.render(&model_text)?, format))
    }
}

impl Processor for LlmResponse {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![
            Relationship::success("Processed successfully"),
            Relationship::failure("Processing failed"),
        ])
    }

    fn property_descriptors(&self) -> Option<Vec<PropertyDescriptor>> {
        Some(vec![
            PropertyDescriptor::named(API_KEY)
                .description("Google Generative AI API key. If empty, uses env GOOGLE_AI_API_KEY.")
                .required(false)
                .sensitive(true)
                .default_value(""),
            PropertyDescriptor::named(SYSTEM_PROMPT)
                .description("Optional system instruction (prefixed to user content).")
                .required(false)
                .sensitive(false)
                .default_value(""),
            PropertyDescriptor::named(RESPONSE_FORMAT)
                .description("Output format: 'text' or 'json'.")
                .required(false)
                .sensitive(false)
                .default_value("text")
                .allowable_values(["text", "json"]),
        ])
    }
}

impl FlowFileTransform for LlmResponse {
    fn transform(
        &self,
        context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        let result = match self.respond(context, &flowfile.contents()) {
            Ok((body, format)) => FlowFileTransformResult::new(
                SUCCESS,
                Some(body.into()),
                json!({
                    "llm.provider": PROVIDER,
                    "llm.client": CLIENT,
                    "llm.format": format.as_str(),
                }),
            )?,
            Err(e) => {
                tracing::warn!(error = %e, "gemini request failed");
                let mut message = e.to_string();
                if message.is_empty() {
                    message = "unknown error".to_string();
                }
                FlowFileTransformResult::new(
                    FAILURE,
                    None,
                    json!({
                        "error": truncate(&message, 512),
                        "llm.provider": PROVIDER,
                        "llm.client": CLIENT,
                    }),
                )?
            }
        };
        Ok(Some(result))
    }
}

pub fn load(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    env.import("nifiapi.flowfiletransform", "FlowFileTransformResult")?;
    env.import("nifiapi.relationship", "Relationship")?;
    env.import("nifiapi.properties", "PropertyDescriptor")?;
    Ok(ModuleExports::new().class(LlmResponse::class()))
}
