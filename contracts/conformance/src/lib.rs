//! nifikit Processor Contract Conformance Harness
//!
//! Checks that processor plugins satisfy the host contract without the host
//! being present. A run:
//!
//! - discovers plugin modules under a source root ([`discovery`])
//! - loads each through the [`ModuleRegistry`](nifikit_host_api::ModuleRegistry)
//!   under an installed stand-in host environment
//! - validates metadata, entry signature, relationships and properties of
//!   every class the module defines ([`validator`])
//! - invokes each plugin once with placeholder inputs ([`smoke`])
//! - aggregates the outcomes into a [`ConformanceReport`]
//!
//! One failing plugin fails the run but does not stop the others from being
//! checked.
//!
//! # Example
//!
//! ```rust,ignore
//! use nifikit_conformance::{ConformanceConfig, TestHarness};
//!
//! let harness = TestHarness::with_config(registry(), ConformanceConfig::from_env());
//! let report = harness.run()?;
//! println!("{}", report.to_text());
//! ```

pub mod discovery;
pub mod error;
pub mod framework;
pub mod guard;
pub mod harness;
pub mod reports;
pub mod smoke;
pub mod validator;
pub mod violation;

pub use discovery::ModuleDiscovery;
pub use error::{ConfigError, DiscoveryError};
pub use framework::{ConformanceConfig, ConformanceRunner, SRC_ROOT_ENV};
pub use harness::TestHarness;
pub use reports::{ConformanceReport, Outcome, PluginReport, ReportSummary, Verdict};
pub use violation::{Violation, ViolationKind};
