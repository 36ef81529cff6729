//! Plugin variants and entry-method signatures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three processor kinds the host knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PluginVariant {
    /// Consumes one flowfile, produces replacement content and a route
    Transform,
    /// Produces zero or one flowfile per invocation
    Source,
    /// Consumes one record, produces a transformed record and a route
    RecordTransform,
}

impl PluginVariant {
    /// All variants, in classification order
    pub fn all() -> [PluginVariant; 3] {
        [
            PluginVariant::Transform,
            PluginVariant::Source,
            PluginVariant::RecordTransform,
        ]
    }

    /// Host interface name the variant corresponds to
    pub fn interface(&self) -> &'static str {
        match self {
            PluginVariant::Transform => "FlowFileTransform",
            PluginVariant::Source => "FlowFileSource",
            PluginVariant::RecordTransform => "RecordTransform",
        }
    }

    /// The exact entry-method shape the host calls
    pub fn expected_signature(&self) -> EntrySignature {
        match self {
            PluginVariant::Transform => {
                EntrySignature::new("transform", ["self", "context", "flowfile"])
            }
            PluginVariant::Source => EntrySignature::new("create", ["self", "context"]),
            PluginVariant::RecordTransform => {
                EntrySignature::new("transform", ["self", "context", "record"])
            }
        }
    }

    /// Whether an invocation may legitimately produce nothing
    pub fn allows_empty_result(&self) -> bool {
        matches!(self, PluginVariant::Source)
    }
}

impl fmt::Display for PluginVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginVariant::Transform => write!(f, "Transform"),
            PluginVariant::Source => write!(f, "Source"),
            PluginVariant::RecordTransform => write!(f, "RecordTransform"),
        }
    }
}

/// Declared shape of an entry method: its name and ordered parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySignature {
    pub method: String,
    pub params: Vec<String>,
}

impl EntrySignature {
    pub fn new<I, S>(method: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: method.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for EntrySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.method, self.params.join(", "))
    }
}

/// A signature declaration that could not be read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed entry signature '{0}'")]
pub struct SignatureParseError(pub String);

impl FromStr for EntrySignature {
    type Err = SignatureParseError;

    /// Parses `method(param, param, ...)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SignatureParseError(s.to_string());
        let trimmed = s.trim();
        let open = trimmed.find('(').ok_or_else(malformed)?;
        let inner = trimmed[open + 1..].strip_suffix(')').ok_or_else(malformed)?;

        let method = trimmed[..open].trim();
        if method.is_empty() || !is_identifier(method) {
            return Err(malformed());
        }

        let mut params = Vec::new();
        if !inner.trim().is_empty() {
            for param in inner.split(',') {
                let param = param.trim();
                if !is_identifier(param) {
                    return Err(malformed());
                }
                params.push(param.to_string());
            }
        }

        Ok(EntrySignature::new(method, params))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
