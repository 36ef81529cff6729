//! Key/value swap of a top-level JSON object
//!
//! Pure logic with no host dependency.

use nifikit_host_api::{HostEnvironment, ImportError, ModuleExports};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MODULE: &str = "demo_processor.swap";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Top-level JSON value must be an object (dict).")]
    NotAnObject,

    #[error(
        "Unsupported value type for key '{key}': {kind}. \
         Only scalar values (str, int, float, bool, None) are allowed."
    )]
    UnsupportedValue { key: String, kind: &'static str },
}

/// Render a scalar the way it reads as a new key
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Null => Some("None".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Swap keys and values of `value`, which must be an object of scalars.
///
/// Values become keys, keys become values. When several keys share a value
/// the last one wins, keeping the position of the first.
pub fn swap_top_level(value: &Value) -> Result<Map<String, Value>, SwapError> {
    let object = value.as_object().ok_or(SwapError::NotAnObject)?;

    let mut swapped = Map::new();
    for (key, value) in object {
        let new_key = key_text(value).ok_or_else(|| SwapError::UnsupportedValue {
            key: key.clone(),
            kind: if value.is_array() { "list" } else { "dict" },
        })?;
        swapped.insert(new_key, Value::String(key.clone()));
    }

    Ok(swapped)
}

/// No host bindings; nothing to declare
pub fn load(_env: &HostEnvironment) -> Result<ModuleExports, ImportError> {
    Ok(ModuleExports::new())
}
