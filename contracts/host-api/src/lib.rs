//! nifikit Host Contract
//!
//! This crate defines the host-side API that processor plugins are written
//! against, implemented as an in-memory stand-in so plugins can be loaded and
//! instantiated without the real flow engine present. It provides:
//!
//! - One trait per plugin variant (`FlowFileTransform`, `FlowFileSource`,
//!   `RecordTransform`)
//! - Result types that validate eagerly at construction time
//! - Relationship and property descriptors
//! - The `HostEnvironment` that plugin modules bind to at load time
//! - The `ModuleRegistry` through which plugin modules announce their classes
//!
//! Result and relationship constructors reject malformed input exactly as the
//! real host does, so a plugin cannot pass conformance by relying on a lax
//! stand-in.

pub mod class;
pub mod details;
pub mod environment;
pub mod error;
pub mod http;
pub mod processor;
pub mod properties;
pub mod registry;
pub mod relationship;
pub mod result;
pub mod variant;

pub use class::{PluginClass, PluginFactory, ProcessorInstance};
pub use details::ProcessorDetails;
pub use environment::{HostEnvironment, HostModule, HOST_PACKAGE};
pub use error::{ConstructionError, ImportError, ProcessorError};
pub use http::{HttpClient, HttpError, OfflineHttpClient};
pub use processor::{FlowFile, FlowFileSource, FlowFileTransform, ProcessContext, Processor, Record, RecordTransform};
pub use properties::{ExpressionLanguageScope, PropertyDescriptor, StandardValidators};
pub use registry::{LoadedModule, ModuleExports, ModuleLoader, ModuleRegistry};
pub use relationship::Relationship;
pub use result::{Content, FlowFileSourceResult, FlowFileTransformResult, RecordTransformResult};
pub use variant::{EntrySignature, PluginVariant, SignatureParseError};
