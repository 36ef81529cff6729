//! Routing relationships

use crate::error::ConstructionError;
use serde::{Deserialize, Serialize};

/// Name of the relationship every processor must declare
pub const SUCCESS: &str = "success";

/// Conventional relationship for routed errors
pub const FAILURE: &str = "failure";

/// A named routing outcome a processor can signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    name: String,
    description: String,
}

impl Relationship {
    /// Create a relationship, rejecting an empty name
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyRelationshipName);
        }
        Ok(Self {
            name,
            description: description.into(),
        })
    }

    /// The `success` relationship with the given description
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            name: SUCCESS.to_string(),
            description: description.into(),
        }
    }

    /// The `failure` relationship with the given description
    pub fn failure(description: impl Into<String>) -> Self {
        Self {
            name: FAILURE.to_string(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
