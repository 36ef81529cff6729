//! Processor class declarations
//!
//! A module announces each processor it defines as a `PluginClass`: the name,
//! the defining module, its metadata, the declared entry signature and a
//! factory. The variant is never stored on its own; it follows from which
//! kind of factory was registered.

use crate::details::ProcessorDetails;
use crate::environment::HostEnvironment;
use crate::error::ProcessorError;
use crate::processor::{FlowFileSource, FlowFileTransform, RecordTransform};
use crate::properties::PropertyDescriptor;
use crate::relationship::Relationship;
use crate::variant::PluginVariant;
use std::fmt;

pub type TransformFactory =
    fn(&HostEnvironment) -> Result<Box<dyn FlowFileTransform>, ProcessorError>;
pub type SourceFactory = fn(&HostEnvironment) -> Result<Box<dyn FlowFileSource>, ProcessorError>;
pub type RecordTransformFactory =
    fn(&HostEnvironment) -> Result<Box<dyn RecordTransform>, ProcessorError>;

/// Constructor for one processor class, tagged by variant
#[derive(Clone, Copy)]
pub enum PluginFactory {
    Transform(TransformFactory),
    Source(SourceFactory),
    RecordTransform(RecordTransformFactory),
}

impl PluginFactory {
    pub fn variant(&self) -> PluginVariant {
        match self {
            PluginFactory::Transform(_) => PluginVariant::Transform,
            PluginFactory::Source(_) => PluginVariant::Source,
            PluginFactory::RecordTransform(_) => PluginVariant::RecordTransform,
        }
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginFactory::{}", self.variant())
    }
}

/// Declaration of a processor class
#[derive(Debug, Clone)]
pub struct PluginClass {
    name: String,
    module: String,
    details: Option<ProcessorDetails>,
    entry: String,
    factory: PluginFactory,
}

impl PluginClass {
    fn new(
        name: impl Into<String>,
        module: impl Into<String>,
        entry: impl Into<String>,
        factory: PluginFactory,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            details: None,
            entry: entry.into(),
            factory,
        }
    }

    /// Declare a flowfile transform. `entry` is the entry method as written,
    /// e.g. `"transform(self, context, flowfile)"`.
    pub fn transform(
        name: impl Into<String>,
        module: impl Into<String>,
        entry: impl Into<String>,
        factory: TransformFactory,
    ) -> Self {
        Self::new(name, module, entry, PluginFactory::Transform(factory))
    }

    /// Declare a flowfile source
    pub fn source(
        name: impl Into<String>,
        module: impl Into<String>,
        entry: impl Into<String>,
        factory: SourceFactory,
    ) -> Self {
        Self::new(name, module, entry, PluginFactory::Source(factory))
    }

    /// Declare a record transform
    pub fn record_transform(
        name: impl Into<String>,
        module: impl Into<String>,
        entry: impl Into<String>,
        factory: RecordTransformFactory,
    ) -> Self {
        Self::new(name, module, entry, PluginFactory::RecordTransform(factory))
    }

    pub fn with_details(mut self, details: ProcessorDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the module that defines this class
    pub fn module(&self) -> &str {
        &self.module
    }

    /// `module.Name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    pub fn details(&self) -> Option<&ProcessorDetails> {
        self.details.as_ref()
    }

    /// Entry signature exactly as declared
    pub fn entry_declaration(&self) -> &str {
        &self.entry
    }

    pub fn variant(&self) -> PluginVariant {
        self.factory.variant()
    }

    /// Construct an instance the way the host would
    pub fn instantiate(&self, env: &HostEnvironment) -> Result<ProcessorInstance, ProcessorError> {
        Ok(match self.factory {
            PluginFactory::Transform(factory) => ProcessorInstance::Transform(factory(env)?),
            PluginFactory::Source(factory) => ProcessorInstance::Source(factory(env)?),
            PluginFactory::RecordTransform(factory) => {
                ProcessorInstance::RecordTransform(factory(env)?)
            }
        })
    }
}

/// A constructed processor
pub enum ProcessorInstance {
    Transform(Box<dyn FlowFileTransform>),
    Source(Box<dyn FlowFileSource>),
    RecordTransform(Box<dyn RecordTransform>),
}

impl ProcessorInstance {
    pub fn variant(&self) -> PluginVariant {
        match self {
            ProcessorInstance::Transform(_) => PluginVariant::Transform,
            ProcessorInstance::Source(_) => PluginVariant::Source,
            ProcessorInstance::RecordTransform(_) => PluginVariant::RecordTransform,
        }
    }

    pub fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
        match self {
            ProcessorInstance::Transform(p) => p.relationships(),
            ProcessorInstance::Source(p) => p.relationships(),
            ProcessorInstance::RecordTransform(p) => p.relationships(),
        }
    }

    pub fn property_descriptors(&self) -> Option<Vec<PropertyDescriptor>> {
        match self {
            ProcessorInstance::Transform(p) => p.property_descriptors(),
            ProcessorInstance::Source(p) => p.property_descriptors(),
            ProcessorInstance::RecordTransform(p) => p.property_descriptors(),
        }
    }
}

impl fmt::Debug for ProcessorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessorInstance::{}", self.variant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{ProcessContext, Processor};
    use crate::result::FlowFileSourceResult;

    struct Ticker;

    impl Processor for Ticker {
        fn relationships(&self) -> Result<Vec<Relationship>, ProcessorError> {
            Ok(vec![Relationship::success("tick")])
        }
    }

    impl FlowFileSource for Ticker {
        fn create(
            &self,
            _context: &dyn ProcessContext,
        ) -> Result<Option<FlowFileSourceResult>, ProcessorError> {
            Ok(None)
        }
    }

    fn ticker(_env: &HostEnvironment) -> Result<Box<dyn FlowFileSource>, ProcessorError> {
        Ok(Box::new(Ticker))
    }

    #[test]
    fn test_variant_follows_factory() {
        let class = PluginClass::source("Ticker", "clock", "create(self, context)", ticker)
            .with_details(ProcessorDetails::new("1.0", "ticks"));
        assert_eq!(class.variant(), PluginVariant::Source);
        assert_eq!(class.qualified_name(), "clock.Ticker");
        assert_eq!(class.entry_declaration(), "create(self, context)");
    }

    #[test]
    fn test_instantiate() {
        let class = PluginClass::source("Ticker", "clock", "create(self, context)", ticker);
        let env = HostEnvironment::stub();
        let instance = class.instantiate(&env).unwrap();
        assert_eq!(instance.variant(), PluginVariant::Source);
        assert_eq!(instance.relationships().unwrap().len(), 1);
        assert!(instance.property_descriptors().is_none());
    }
}
