//! Synthetic invocation of a plugin's entry method
//!
//! Each plugin is called once with placeholder inputs. The result must have
//! the variant's shape and route to a declared relationship. An error or a
//! panic escaping the entry method is recorded, never propagated.

use crate::guard;
use crate::violation::Violation;
use nifikit_host_api::{FlowFile, ProcessContext, ProcessorError, ProcessorInstance, Record};
use std::collections::{BTreeMap, BTreeSet};

/// Context whose property lookup never comes back empty-handed
#[derive(Debug, Clone, Default)]
pub struct PlaceholderContext {
    values: BTreeMap<String, String>,
}

impl PlaceholderContext {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl ProcessContext for PlaceholderContext {
    /// Configured placeholder, or an empty string for any other name
    fn property(&self, name: &str) -> Option<String> {
        Some(self.values.get(name).cloned().unwrap_or_default())
    }
}

/// Flowfile with fixed content
#[derive(Debug, Clone)]
pub struct PlaceholderFlowFile {
    payload: Vec<u8>,
}

impl PlaceholderFlowFile {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl FlowFile for PlaceholderFlowFile {
    fn contents(&self) -> Vec<u8> {
        self.payload.clone()
    }
}

/// Inputs handed to every smoke invocation
#[derive(Debug, Clone)]
pub struct SmokeInputs {
    pub context: PlaceholderContext,
    pub flowfile: PlaceholderFlowFile,
    pub record: Record,
}

/// Run `call`, turning an `Err` or a panic into a smoke violation
fn guarded<T>(
    plugin: &str,
    method: &str,
    call: impl FnOnce() -> Result<T, ProcessorError>,
) -> Result<T, Violation> {
    match guard::contain(call) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(Violation::smoke(plugin, format!("{method}() raised: {e}"))),
        Err(message) => Err(Violation::smoke(
            plugin,
            format!("{method}() panicked: {message}"),
        )),
    }
}

fn declared_route(
    plugin: &str,
    relationship: &str,
    declared: &BTreeSet<String>,
) -> Result<(), Violation> {
    if declared.contains(relationship) {
        Ok(())
    } else {
        Err(Violation::smoke(
            plugin,
            format!("result relationship '{relationship}' is not declared"),
        ))
    }
}

fn contents_len(contents: Option<&[u8]>) -> String {
    contents
        .map(|c| c.len().to_string())
        .unwrap_or_else(|| "None".to_string())
}

fn keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    let keys: Vec<&str> = keys.map(String::as_str).collect();
    format!("[{}]", keys.join(", "))
}

/// Invoke the entry method once and check the result.
///
/// Returns a one-line description of the result for the report.
pub fn invoke(
    plugin: &str,
    instance: &ProcessorInstance,
    declared: &BTreeSet<String>,
    inputs: &SmokeInputs,
) -> Result<String, Violation> {
    match instance {
        ProcessorInstance::Transform(processor) => {
            let result = guarded(plugin, "transform", || {
                processor.transform(&inputs.context, &inputs.flowfile)
            })?
            .ok_or_else(|| {
                Violation::smoke(plugin, "transform() returned None; only sources may")
            })?;
            declared_route(plugin, result.relationship(), declared)?;
            Ok(format!(
                "relationship={}, contents_len={}, attrs={}",
                result.relationship(),
                contents_len(result.contents()),
                keys(result.attributes().keys())
            ))
        }
        ProcessorInstance::Source(processor) => {
            match guarded(plugin, "create", || processor.create(&inputs.context))? {
                None => Ok("create() returned None (no flowfile this tick)".to_string()),
                Some(result) => {
                    declared_route(plugin, result.relationship(), declared)?;
                    Ok(format!(
                        "relationship={}, contents_len={}, attrs={}",
                        result.relationship(),
                        contents_len(result.contents()),
                        keys(result.attributes().keys())
                    ))
                }
            }
        }
        ProcessorInstance::RecordTransform(processor) => {
            let result = guarded(plugin, "transform", || {
                processor.transform(&inputs.context, &inputs.record)
            })?
            .ok_or_else(|| {
                Violation::smoke(plugin, "transform() returned None; only sources may")
            })?;
            declared_route(plugin, result.relationship(), declared)?;
            Ok(format!(
                "relationship={}, record_keys={}, attrs={}",
                result.relationship(),
                keys(result.record().keys()),
                keys(result.attributes().keys())
            ))
        }
    }
}
