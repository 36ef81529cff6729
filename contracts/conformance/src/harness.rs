//! Test harness for running conformance checks

use crate::error::DiscoveryError;
use crate::reports::ConformanceReport;
use crate::{ConformanceConfig, ConformanceRunner};
use nifikit_host_api::{HostEnvironment, ModuleRegistry};

/// Owns an installed host environment and the registry of plugin modules
pub struct TestHarness {
    runner: ConformanceRunner,
    env: HostEnvironment,
    registry: ModuleRegistry,
}

impl TestHarness {
    /// Harness over `registry`, configured from the environment
    pub fn new(registry: ModuleRegistry) -> Self {
        Self::with_config(registry, ConformanceConfig::from_env())
    }

    /// Create a test harness with custom configuration
    pub fn with_config(registry: ModuleRegistry, config: ConformanceConfig) -> Self {
        Self {
            runner: ConformanceRunner::new(config),
            env: HostEnvironment::stub(),
            registry,
        }
    }

    /// Replace the host environment; it is (re)installed before use
    pub fn with_environment(mut self, mut env: HostEnvironment) -> Self {
        env.install();
        self.env = env;
        self
    }

    pub fn environment(&self) -> &HostEnvironment {
        &self.env
    }

    pub fn config(&self) -> &ConformanceConfig {
        self.runner.config()
    }

    /// Run conformance checks and return the report
    pub fn run(&self) -> Result<ConformanceReport, DiscoveryError> {
        self.runner.run(&self.env, &self.registry)
    }

    /// Run checks and panic with the text report unless conformant
    pub fn assert_conformant(&self) {
        let report = match self.run() {
            Ok(report) => report,
            Err(e) => panic!("conformance run aborted: {e}"),
        };

        if !report.is_conformant() {
            panic!(
                "processors under '{}' are not conformant ({}):\n{}",
                report.source_root,
                report.verdict(),
                report.to_text()
            );
        }
    }
}
