//! Demo processor package: JSON key/value swap

pub mod swap;

use crate::truncate;
use nifikit_host_api::relationship::{FAILURE, SUCCESS};
use nifikit_host_api::{
    FlowFile, FlowFileTransform, FlowFileTransformResult, HostEnvironment, ImportError,
    ModuleExports, PluginClass, ProcessContext, Processor, ProcessorDetails, ProcessorError,
    Relationship,
};
use serde_json::{json, Value};
use swap::{swap_top_level, SwapError};
use thiserror::Error;

pub const MODULE: &str = "demo_processor";

/// Longest error text kept in the `json.swap.error` attribute
const MAX_ERROR_CHARS: usize = 512;

#[derive(Debug, Error)]
enum SwapFailure {
    #[error("{0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

/// Swaps keys and values of a top-level JSON object.
///
/// `{"a": 1, "b": 2, "c": 1}` becomes `{"1": "c", "2": "b"}`. Anything that
/// is not an object of scalars routes to `failure` with the content kept.
#[derive(Debug, Default)]
pub struct JsonKeyValueSwap;

impl JsonKeyValueSwap {
    pub fn details() -> ProcessorDetails {
        ProcessorDetails::new(
            "0.1.2",
            "Demo processor that swaps keys and values of a top-level JSON object. \
             Values become new keys (stringified), keys become new values. \
             Only simple scalar values are supported.",
        )
        .with_tags(["demo", "json", "swap", "python"])
        .with_dependencies(Vec::<String>::new())
    }

    pub fn class() -> PluginClass {
        PluginClass::transform(
            "JsonKeyValueSwap",
            MODULE,
            "transform(self, context, flowfile)",
            Self::create,
        )
        .with_details(Self::details())
    }

    fn create(_env: &HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError> {
        Ok(Box::new(Self))
    }

    fn swap(data: &[u8]) -> Result<(String, usize, usize), SwapFailure> {
        let text = std::str::from_utf8(data)?;
        let parsed: Value = serde_json::from_str(text)?;
        let swapped = swap_top_level(&parsed)?;
        let original_size = parsed.as_object().map_or(0, |o| o.len());
        let result_size = swapped.len();
        Ok((
            serde_json::to_string(&swapped)?,
            original_size,
            result_size,
        ))
    }
}

impl Processor for JsonKeyValueSwap {
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        Ok(vec![
            Relationship::new(SUCCESS, "JSON successfully swapped (keys <-> values)")?,
            Relationship::new(FAILURE, "Error while processing JSON; original content kept")?,
        ])
    }
}

impl FlowFileTransform for JsonKeyValueSwap {
    fn transform(
        &self,
        _context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError> {
        let data = flowfile.contents();

        let result = match Self::swap(&data) {
            Ok((swapped, original_size, result_size)) => FlowFileTransformResult::new(
                SUCCESS,
                Some(swapped.into_bytes().into()),
                json!({
                    "json.swap": "true",
                    "json.swap.original.size": original_size.to_string(),
                    "json.swap.result.size": result_size.to_string(),
                }),
            )?,
            Err(e) => {
                tracing::debug!(error = %e, "json swap failed");
                FlowFileTransformResult::new(
                    FAILURE,
                    None,
                    json!({
                        "json.swap": "false",
                        "json.swap.error": truncate(&e.to_string(), MAX_ERROR_CHARS),
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
    Ok(ModuleExports::new().class(JsonKeyValueSwap::class()))
}
