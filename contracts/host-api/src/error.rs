//! Host contract errors

use thiserror::Error;

/// Rejection raised by a host constructor (results, relationships).
///
/// Raised eagerly so the plugin under construction sees it at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("relationship must be non-empty str")]
    EmptyRelationship,

    #[error("relationship.name must be non-empty str")]
    EmptyRelationshipName,

    #[error("contents must be {expected}, got {actual}")]
    ContentShape {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("record must be dict, got {0}")]
    RecordShape(&'static str),

    #[error("attributes must be dict[str,str], got {0}")]
    AttributesShape(&'static str),

    #[error("attributes must be dict[str,str]: value of '{key}' is {actual}")]
    AttributeValue { key: String, actual: &'static str },
}

/// Failure to load a plugin module under the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("No module named '{0}'")]
    ModuleNotFound(String),

    #[error("host module '{0}' is not bound in this environment")]
    HostModuleUnbound(String),

    #[error("cannot import name '{symbol}' from '{module}'")]
    SymbolNotExported { module: String, symbol: String },

    #[error("module '{module}' failed to load: {reason}")]
    Load { module: String, reason: String },
}

/// Error raised by plugin code (construction, listing, entry methods).
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("processor error: {0}")]
    Processing(String),
}

impl ProcessorError {
    /// Shorthand for a free-form processing error
    pub fn processing(message: impl Into<String>) -> Self {
        ProcessorError::Processing(message.into())
    }
}
