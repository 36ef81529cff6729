//! HelloTransform processor

use super::hello;
use crate::truncate;
use nifikit_host_api::relationship::{FAILURE, SUCCESS};
use nifikit_host_api::{
    FlowFile, FlowFileTransform, FlowFileTransformResult, HostEnvironment, ImportError,
    ModuleExports, PluginClass, ProcessContext, Processor, ProcessorDetails, ProcessorError,
    Relationship,
};
use serde_json::{json, Map, Value};

pub const MODULE: &str = "hello_processor.hello_transform";

/// Sets `greeting=Hello` and prefixes the content with `Hello `
#[derive(Debug, Default)]
pub struct HelloTransform;

impl HelloTransform {
    pub fn class() -> PluginClass {
        PluginClass::transform(
            "HelloTransform",
            MODULE,
            "transform(self, context, flowfile)",
            Self::create,
        )
        .with_details(
            ProcessorDetails::new(
                "0.1.4",
                "Adds greeting=Hello and prefixes content with 'Hello ' (or sets 'Hello' if empty).",
            )
            .with_tags(["hello", "python", "transform"]),
        )
    }

    fn create(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
        Ok(Box::new(Self))
    }

    fn greet(data: &[u8]) -> Result<FlowFileTransformResult, ProcessorError> {
        let (body, attributes) = hello::transform(data);
        let attributes: Map<String, Value> = attributes
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Ok(FlowFileTransformResult::new(
            SUCCESS,
            Some(body.into()),
            Value::Object(attributes),
        )?)
    }
}

impl Processor for HelloTransform {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![
            Relationship::success("Processed successfully"),
            Relationship::failure("Processing failed"),
        ])
    }
}

impl FlowFileTransform for HelloTransform {
    fn transform(
        &self,
        _context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        let result = match Self::greet(&flowfile.contents()) {
            Ok(result) => result,
            Err(e) => FlowFileTransformResult::new(
                FAILURE,
                None,
                json!({ "error": truncate(&e.to_string(), 512) }),
            )?,
        };
        Ok(Some(result))
    }
}

pub fn load(env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    env.import("nifiapi.flowfiletransform", "FlowFileTransform")?;
    env.import("nifiapi.flowfiletransform", "FlowFileTransformResult")?;
    env.import("nifiapi.relationship", "Relationship")?;
    Ok(ModuleExports::new().class(HelloTransform::class()))
}
