//! Contract violations
//!
//! Every check returns `Result<_, Violation>`. A violation names the plugin
//! (or module, for import failures), the check that failed and the reason.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which check a violation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Module could not be loaded under the host environment
    Import,
    /// Processor details missing or malformed
    Metadata,
    /// Entry method declared with the wrong shape
    Signature,
    /// Relationship set empty, duplicated or missing `success`
    Relationship,
    /// A property descriptor is malformed
    Property,
    /// The synthetic invocation failed or returned a bad result
    Smoke,
    /// Instantiation or relationship listing was rejected
    Construction,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::Import => "ImportError",
            ViolationKind::Metadata => "MetadataViolation",
            ViolationKind::Signature => "SignatureViolation",
            ViolationKind::Relationship => "RelationshipViolation",
            ViolationKind::Property => "PropertyViolation",
            ViolationKind::Smoke => "SmokeViolation",
            ViolationKind::Construction => "ConstructionViolation",
        };
        f.write_str(name)
    }
}

/// A failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind} [{subject}]: {reason}")]
pub struct Violation {
    pub kind: ViolationKind,
    /// Plugin class name, or module id for import failures
    pub subject: String,
    pub reason: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    pub fn import(module: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::new(ViolationKind::Import, module, reason.to_string())
    }

    pub fn metadata(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Metadata, plugin, reason)
    }

    pub fn signature(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Signature, plugin, reason)
    }

    pub fn relationship(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Relationship, plugin, reason)
    }

    pub fn property(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Property, plugin, reason)
    }

    pub fn smoke(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Smoke, plugin, reason)
    }

    pub fn construction(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ViolationKind::Construction, plugin, reason)
    }
}
