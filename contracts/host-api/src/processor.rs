//! Processor traits
//!
//! A plugin implements `Processor` plus exactly one variant trait. Entry
//! methods return `Ok(None)` to signal "no result"; only sources may do so
//! legitimately, the host treats it as a contract breach for the others.

use crate::error::ProcessorError;
use crate::properties::PropertyDescriptor;
use crate::relationship::Relationship;
use crate::result::{FlowFileSourceResult, FlowFileTransformResult, RecordTransformResult};
use serde_json::{Map, Value};

/// A structured record handed to record transforms
pub type Record = Map<String, Value>;

/// Per-invocation view of the processor's configuration
pub trait ProcessContext {
    /// Configured value of a property, if any
    fn property(&self, name: &str) -> Option<String>;
}

/// The content unit a transform operates on
pub trait FlowFile {
    /// Full content as bytes
    fn contents(&self) -> Vec<u8>;

    /// Attribute lookup
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }

    fn size(&self) -> usize {
        self.contents().len()
    }
}

/// Declarations common to every processor variant
pub trait Processor: Send + Sync {
    /// Routing outcomes this processor can signal
    fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError>;

    /// Configurable properties, or `None` when the processor has none to offer
    fn property_descriptors(&self) -> Option<Vec<PropertyDescriptor>> {
        None
    }
}

/// Consumes one flowfile, produces replacement content and a route
pub trait FlowFileTransform: Processor {
    fn transform(
        &self,
        context: &dyn ProcessContext,
        flowfile: &dyn FlowFile,
    ) -> Result<Option<FlowFileTransformResult>, ProcessorError>;
}

/// Produces zero or one flowfile per invocation
pub trait FlowFileSource: Processor {
    fn create(
        &self,
        context: &dyn ProcessContext,
    ) -> Result<Option<FlowFileSourceResult>, ProcessorError>;
}

/// Consumes one record, produces a transformed record and a route
pub trait RecordTransform: Processor {
    fn transform(
        &self,
        context: &dyn ProcessContext,
        record: &Record,
    ) -> Result<Option<RecordTransformResult>, ProcessorError>;
}
