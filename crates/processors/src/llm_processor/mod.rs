//! LLM processor package
//!
//! The package root holds `LlmRequestProcessor`, which forwards flowfile text
//! to a self-hosted `/generate` endpoint. `LlmResponse` (Gemini) lives in its
//! own module and is re-exported here.

pub mod llm_client;
pub mod llm_response;
pub mod request;

pub use llm_response::LlmResponse;

use crate::truncate;
use llm_client::{call_llm, GenerateRequest};
use nifikit_host_api::relationship::{FAILURE, SUCCESS};
use nifikit_host_api::{
    FlowFile, FlowFileTransform, FlowFileTransformResult, HostEnvironment, HttpClient,
    ImportError, ModuleExports, PluginClass, ProcessContext, Processor, ProcessorDetails,
    ProcessorError, PropertyDescriptor, Relationship,
};
use serde_json::json;
use std::sync::Arc;

pub const MODULE: &str = "llm_processor";

const HOST: &str = "HOST";
const PORT: &str = "PORT";
const SYSTEM_PROMPT: &str = "System Prompt";
const TEMPERATURE: &str = "Temperature";

const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Replaces flowfile text with the response of an LLM endpoint
pub struct LlmRequestProcessor {
    http: Arc<dyn HttpClient>,
}

impl LlmRequestProcessor {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub fn class() -> PluginClass {
        PluginClass::transform(
            "LlmRequestProcessor",
            MODULE,
            "transform(self, context, flowfile)",
            Self::create,
        )
        .with_details(
            ProcessorDetails::new(
                "0.1.1",
                "Sends FlowFile text to an external LLM endpoint using HOST, PORT, \
                 system prompt and temperature.",
            )
            .with_tags(["llm", "ai", "http", "demo"])
            .with_dependencies(["reqwest"]),
        )
    }

    fn create(env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
        Ok(Box::new(Self::new(env.http())))
    }

    fn generate(&self, context: &dyn ProcessContext, data: &[u8]) -> Result<String, ProcessorError> {
        let user_text =
            std::str::from_utf8(data).map_err(|e| ProcessorError::processing(e.to_string()))?;

        let host = context.property(HOST).filter(|h| !h.is_empty());
        let port = context.property(PORT).filter(|p| !p.is_empty());
        let (Some(host), Some(port)) = (host, port) else {
            return Err(ProcessorError::MissingConfiguration(
                "HOST and PORT properties must be set".to_string(),
            ));
        };

        let system_prompt = context.property(SYSTEM_PROMPT).unwrap_or_default();
        let temperature = context
            .property(TEMPERATURE)
            .and_then(|t| t.trim().parse::<f64>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let request = GenerateRequest {
            host: &host,
            port: &port,
            system_prompt: &system_prompt,
            temperature,
            user_text,
        };
        call_llm(self.http.as_ref(), &request).map_err(|e| ProcessorError::processing(e.to_string()))
    }
}

impl Processor for LlmRequestProcessor {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![
            Relationship::success("LLM response received; content replaced"),
            Relationship::failure("LLM call failed; original content kept"),
        ])
    }

    fn property_descriptors(&self) -> Option<Vec<PropertyDescriptor>> {
        Some(vec![
            PropertyDescriptor::named(HOST)
                .description("Hostname of the LLM instance (e.g. 127.0.0.1).")
                .required(true)
                .sensitive(false),
            PropertyDescriptor::named(PORT)
                .description("Port of the LLM instance (e.g. 8000).")
                .required(true)
                .sensitive(false),
            PropertyDescriptor::named(SYSTEM_PROMPT)
                .description("System prompt text.")
                .required(false)
                .sensitive(false),
            PropertyDescriptor::named(TEMPERATURE)
                .description("Sampling temperature (float, e.g. 0.7).")
                .required(false)
                .sensitive(false),
        ])
    }
}

impl FlowFileTransform for LlmRequestProcessor {
    fn transform(
        &self,
        context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        let result = match self.generate(context, &flowfile.contents()) {
            Ok(text) => FlowFileTransformResult::new(
                SUCCESS,
                Some(text.into_bytes().into()),
                json!({ "llm.success": "true" }),
            )?,
            Err(e) => {
                tracing::warn!(error = %e, "llm request failed");
                FlowFileTransformResult::new(
                    FAILURE,
                    None,
                    json!({
                        "llm.success": "false",
                        "llm.error": truncate(&e.to_string(), 512),
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
    Ok(ModuleExports::new()
        .class(LlmRequestProcessor::class())
        .class(LlmResponse::class()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifikit_host_api::HttpError;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::time::Duration;

    struct Properties(BTreeMap<&'static str, &'static str>);

    impl ProcessContext for Properties {
        fn property(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    struct Body(&'static [u8]);

    impl FlowFile for Body {
        fn contents(&self) -> Vec<u8> {
            self.0.to_vec()
        }
    }

    /// Replies with the request body under `response`
    struct Mirror;

    impl HttpClient for Mirror {
        fn post_json(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
            body: &Value,
            _timeout: Duration,
        ) -> Result<Value, HttpError> {
            Ok(json!({ "response": format!("{} {} {}", url, body["prompt"], body["temperature"]) }))
        }
    }

    fn run(pairs: &[(&'static str, &'static str)]) -> FlowFileTransformResult {
        let ctx = Properties(pairs.iter().copied().collect());
        LlmRequestProcessor::new(Arc::new(Mirror))
            .transform(&ctx, &Body(b"hi"))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_forwards_to_endpoint() {
        let result = run(&[("HOST", "llm"), ("PORT", "8000"), ("Temperature", "0.1")]);
        assert_eq!(result.relationship(), "success");
        assert_eq!(
            result.contents(),
            Some(&br#"http://llm:8000/generate "hi" 0.1"#[..])
        );
        assert_eq!(result.attributes()["llm.success"], "true");
    }

    #[test]
    fn test_bad_temperature_falls_back() {
        let result = run(&[("HOST", "llm"), ("PORT", "8000"), ("Temperature", "warm")]);
        let text = String::from_utf8(result.contents().unwrap().to_vec()).unwrap();
        assert!(text.ends_with(" 0.7"));
    }

    #[test]
    fn test_missing_host_routes_failure() {
        let result = run(&[("HOST", ""), ("PORT", "8000")]);
        assert_eq!(result.relationship(), "failure");
        assert_eq!(result.attributes()["llm.success"], "false");
        assert!(result.attributes()["llm.error"].contains("HOST and PORT"));
    }

    #[test]
    fn test_package_reexports_llm_response() {
        let env = HostEnvironment::stub();
        let exports = load(&env).unwrap();
        let modules: Vec<&str> = exports.classes().iter().map(|c| c.module()).collect();
        assert_eq!(modules, vec![MODULE, llm_response::MODULE]);
    }
}
