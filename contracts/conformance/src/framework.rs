//! Conformance test framework

use crate::discovery::ModuleDiscovery;
use crate::error::{ConfigError, DiscoveryError};
use crate::guard;
use crate::reports::{ConformanceReport, Outcome, PluginReport};
use crate::smoke::{self, PlaceholderContext, PlaceholderFlowFile, SmokeInputs};
use crate::validator;
use crate::violation::Violation;
use nifikit_host_api::{HostEnvironment, ImportError, ModuleRegistry, PluginClass, Record};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Environment variable overriding the discovery root
pub const SRC_ROOT_ENV: &str = "NIFI_SRC_ROOT";

/// Configuration for conformance testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformanceConfig {
    /// Directory scanned for plugin modules
    pub src_root: PathBuf,

    /// Values the placeholder context returns for known property names
    pub placeholder_properties: BTreeMap<String, String>,

    /// Content of the placeholder flowfile
    pub smoke_payload: String,

    /// Record handed to record transforms
    pub sample_record: Record,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        let sample_record = match json!({"a": 1}) {
            Value::Object(record) => record,
            _ => Record::new(),
        };
        Self {
            src_root: PathBuf::from("src"),
            placeholder_properties: BTreeMap::new(),
            smoke_payload: "ping".to_string(),
            sample_record,
        }
    }
}

impl ConformanceConfig {
    /// Defaults, with the root taken from `NIFI_SRC_ROOT` when set
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some(path) => {
                tracing::debug!(path = %path.display(), "config file not found; using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(root) = std::env::var(SRC_ROOT_ENV) {
            if !root.trim().is_empty() {
                self.src_root = PathBuf::from(root);
            }
        }
        self
    }

    pub fn with_src_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.src_root = root.into();
        self
    }

    pub fn with_placeholder(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholder_properties.insert(name.into(), value.into());
        self
    }

    fn smoke_inputs(&self) -> SmokeInputs {
        SmokeInputs {
            context: PlaceholderContext::new(self.placeholder_properties.clone()),
            flowfile: PlaceholderFlowFile::new(self.smoke_payload.as_bytes()),
            record: self.sample_record.clone(),
        }
    }
}

/// Conformance test runner
pub struct ConformanceRunner {
    config: ConformanceConfig,
}

impl ConformanceRunner {
    /// Create a new conformance runner
    pub fn new(config: ConformanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConformanceConfig {
        &self.config
    }

    /// Discover, load and check every plugin module under the source root.
    ///
    /// Only an unreadable root is an error; every other problem is recorded
    /// in the report and the run moves on.
    pub fn run(
        &self,
        env: &HostEnvironment,
        registry: &ModuleRegistry,
    ) -> Result<ConformanceReport, DiscoveryError> {
        let start = Instant::now();
        let root = &self.config.src_root;
        let mut report = ConformanceReport::new(root.display().to_string());

        tracing::info!("Scanning processors under: {}", root.display());

        let discovery = ModuleDiscovery::new(root);
        if !discovery.root_exists() {
            report.add_warning(format!("source root not found: {}", root.display()));
        }
        if !env.is_installed() {
            tracing::warn!("host environment is not installed; module loads will fail");
        }

        let inputs = self.config.smoke_inputs();

        for module_id in discovery.iter()? {
            tracing::info!("Importing module: {}", module_id);
            report.add_module(module_id.as_str());

            let loaded = guard::contain(|| registry.load(&module_id, env))
                .unwrap_or_else(|message| {
                    Err(ImportError::Load {
                        module: module_id.clone(),
                        reason: format!("loader panicked: {message}"),
                    })
                });
            let module = match loaded {
                Ok(module) => module,
                Err(e) => {
                    tracing::warn!("Import failed: {}: {}", module_id, e);
                    report.add_entry(PluginReport::import_failure(
                        module_id.as_str(),
                        Violation::import(module_id.as_str(), &e),
                    ));
                    continue;
                }
            };

            for class in module.defined_classes() {
                report.add_entry(self.check_class(class, env, &inputs));
            }
        }

        report.duration = start.elapsed();
        report.finalize();

        tracing::info!(
            "Conformance run complete: {} modules, {} plugins, {} passed, {} failed ({})",
            report.summary.modules,
            report.summary.plugins,
            report.summary.passed,
            report.summary.failed,
            report.verdict()
        );

        Ok(report)
    }

    fn check_class(
        &self,
        class: &PluginClass,
        env: &HostEnvironment,
        inputs: &SmokeInputs,
    ) -> PluginReport {
        let start = Instant::now();
        let mut entry = PluginReport::plugin(class.module(), class.name(), class.variant());

        tracing::info!(
            "Processor class found: {} ({})",
            class.name(),
            class.variant()
        );

        if let Err(violation) = self.check_contract(class, env, inputs, &mut entry) {
            tracing::warn!("{}", violation);
            entry.outcome = Outcome::Fail(violation);
        }

        entry.duration = start.elapsed();
        entry
    }

    fn check_contract(
        &self,
        class: &PluginClass,
        env: &HostEnvironment,
        inputs: &SmokeInputs,
        entry: &mut PluginReport,
    ) -> Result<(), Violation> {
        let name = class.name();

        let details = validator::check_details(class)?;
        tracing::info!("ProcessorDetails [{}]: {}", name, details);
        entry.add_detail("details", details);

        let signature = validator::check_signature(class)?;
        tracing::info!("Method signature: {}.{}", name, signature);
        entry.add_detail("signature", signature);

        let instance = guard::contain(|| class.instantiate(env))
            .map_err(|message| {
                Violation::construction(name, format!("instantiation panicked: {message}"))
            })?
            .map_err(|e| Violation::construction(name, format!("instantiation failed: {e}")))?;

        let declared = validator::check_relationships(name, &instance)?;
        let listed: Vec<&str> = declared.iter().map(String::as_str).collect();
        tracing::info!("Relationships [{}]: {}", name, listed.join(", "));
        entry.add_detail("relationships", listed.join(", "));

        if let Some(properties) = validator::check_properties(name, &instance)? {
            tracing::info!("Properties [{}]: {}", name, properties);
            entry.add_detail("properties", properties);
        }

        let observed = smoke::invoke(name, &instance, &declared, inputs)?;
        tracing::info!("Smoke result [{}]: {}", name, observed);
        entry.add_detail("smoke", observed);

        Ok(())
    }
}
