//! Invocation results
//!
//! Each variant has its own result type. Constructors validate eagerly and
//! return `ConstructionError` to the calling processor; nothing malformed ever
//! reaches the host.

use crate::error::ConstructionError;
use crate::processor::Record;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Content a processor hands to a result constructor
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Bytes(Vec<u8>),
    Text(String),
    Structured(Value),
}

impl Content {
    fn kind(&self) -> &'static str {
        match self {
            Content::Bytes(_) => "bytes",
            Content::Text(_) => "str",
            Content::Structured(v) => value_kind(v),
        }
    }
}

impl From<Vec<u8>> for Content {
    fn from(bytes: Vec<u8>) -> Self {
        Content::Bytes(bytes)
    }
}

impl From<&[u8]> for Content {
    fn from(bytes: &[u8]) -> Self {
        Content::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Content {
    fn from(bytes: &[u8; N]) -> Self {
        Content::Bytes(bytes.to_vec())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        Content::Structured(value)
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn validate_relationship(relationship: String) -> Result<String, ConstructionError> {
    if relationship.is_empty() {
        return Err(ConstructionError::EmptyRelationship);
    }
    Ok(relationship)
}

/// `null` means no attributes; anything else must be a mapping of strings.
fn validate_attributes(attributes: Value) -> Result<BTreeMap<String, String>, ConstructionError> {
    match attributes {
        Value::Null => Ok(BTreeMap::new()),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key, s)),
                other => Err(ConstructionError::AttributeValue {
                    key,
                    actual: value_kind(&other),
                }),
            })
            .collect(),
        other => Err(ConstructionError::AttributesShape(value_kind(&other))),
    }
}

/// Result of `FlowFileTransform::transform`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowFileTransformResult {
    relationship: String,
    contents: Option<Vec<u8>>,
    attributes: BTreeMap<String, String>,
}

impl FlowFileTransformResult {
    /// Contents must be bytes or absent.
    pub fn new(
        relationship: impl Into<String>,
        contents: Option<Content>,
        attributes: Value,
    ) -> Result<Self, ConstructionError> {
        let relationship = validate_relationship(relationship.into())?;
        let contents = match contents {
            None => None,
            Some(Content::Bytes(bytes)) => Some(bytes),
            Some(other) => {
                return Err(ConstructionError::ContentShape {
                    expected: "bytes or None",
                    actual: other.kind(),
                })
            }
        };
        let attributes = validate_attributes(attributes)?;
        Ok(Self {
            relationship,
            contents,
            attributes,
        })
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Result of `FlowFileSource::create`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowFileSourceResult {
    relationship: String,
    contents: Option<Vec<u8>>,
    attributes: BTreeMap<String, String>,
}

impl FlowFileSourceResult {
    /// Contents may be bytes, text (stored UTF-8 encoded) or absent.
    pub fn new(
        relationship: impl Into<String>,
        contents: Option<Content>,
        attributes: Value,
    ) -> Result<Self, ConstructionError> {
        let relationship = validate_relationship(relationship.into())?;
        let contents = match contents {
            None => None,
            Some(Content::Bytes(bytes)) => Some(bytes),
            Some(Content::Text(text)) => Some(text.into_bytes()),
            Some(other) => {
                return Err(ConstructionError::ContentShape {
                    expected: "bytes|str|None",
                    actual: other.kind(),
                })
            }
        };
        let attributes = validate_attributes(attributes)?;
        Ok(Self {
            relationship,
            contents,
            attributes,
        })
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

/// Result of `RecordTransform::transform`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTransformResult {
    record: Record,
    relationship: String,
    attributes: BTreeMap<String, String>,
}

impl RecordTransformResult {
    /// The record must be a mapping.
    pub fn new(
        record: Value,
        relationship: impl Into<String>,
        attributes: Value,
    ) -> Result<Self, ConstructionError> {
        let record = match record {
            Value::Object(map) => map,
            other => return Err(ConstructionError::RecordShape(value_kind(&other))),
        };
        let relationship = validate_relationship(relationship.into())?;
        let attributes = validate_attributes(attributes)?;
        Ok(Self {
            record,
            relationship,
            attributes,
        })
    }

    /// Routes to `success` with no attributes
    pub fn success(record: Value) -> Result<Self, ConstructionError> {
        Self::new(record, crate::relationship::SUCCESS, Value::Null)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn relationship(&self) -> &str {
        &self.relationship
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_result_accepts_bytes() {
        let result =
            FlowFileTransformResult::new("success", Some(b"ok".into()), json!({})).unwrap();
        assert_eq!(result.relationship(), "success");
        assert_eq!(result.contents(), Some(&b"ok"[..]));
        assert!(result.attributes().is_empty());
    }

    #[test]
    fn test_transform_result_rejects_text() {
        let err = FlowFileTransformResult::new("success", Some("text".into()), Value::Null)
            .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::ContentShape {
                expected: "bytes or None",
                actual: "str"
            }
        );
    }

    #[test]
    fn test_rejects_empty_relationship() {
        let err = FlowFileTransformResult::new("", None, Value::Null).unwrap_err();
        assert_eq!(err, ConstructionError::EmptyRelationship);
    }

    #[test]
    fn test_rejects_non_string_attribute_value() {
        let err = FlowFileTransformResult::new("success", None, json!({"size": 3})).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::AttributeValue {
                key: "size".to_string(),
                actual: "number"
            }
        );
    }

    #[test]
    fn test_rejects_non_mapping_attributes() {
        let err = FlowFileSourceResult::new("success", None, json!(["a"])).unwrap_err();
        assert_eq!(err, ConstructionError::AttributesShape("list"));
    }

    #[test]
    fn test_source_result_encodes_text() {
        let result = FlowFileSourceResult::new("success", Some("tick".into()), Value::Null).unwrap();
        assert_eq!(result.contents(), Some(&b"tick"[..]));
    }

    #[test]
    fn test_source_result_rejects_structured_content() {
        let err =
            FlowFileSourceResult::new("success", Some(json!({"a": 1}).into()), Value::Null)
                .unwrap_err();
        assert!(matches!(err, ConstructionError::ContentShape { actual: "dict", .. }));
    }

    #[test]
    fn test_record_result_requires_mapping() {
        assert_eq!(
            RecordTransformResult::success(json!([1, 2])).unwrap_err(),
            ConstructionError::RecordShape("list")
        );
        let ok = RecordTransformResult::success(json!({"a": 1})).unwrap();
        assert_eq!(ok.relationship(), "success");
        assert_eq!(ok.record().get("a"), Some(&json!(1)));
    }
}
