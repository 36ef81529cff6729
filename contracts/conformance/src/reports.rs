//! Conformance reporting

use crate::violation::Violation;
use chrono::{DateTime, Utc};
use nifikit_host_api::PluginVariant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Outcome of checking one plugin class or loading one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "violation", rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail(Violation),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail(v) => Some(v),
        }
    }
}

/// One report entry: a checked plugin class, or a module that failed to load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginReport {
    /// Module the entry came from
    pub module: String,
    /// Class name; absent when the module itself failed to load
    pub plugin: Option<String>,
    pub variant: Option<PluginVariant>,
    pub outcome: Outcome,
    pub duration: Duration,
    /// Per-check observations, keyed by check name
    pub details: BTreeMap<String, String>,
}

impl PluginReport {
    /// Entry for a plugin class
    pub fn plugin(
        module: impl Into<String>,
        plugin: impl Into<String>,
        variant: PluginVariant,
    ) -> Self {
        Self {
            module: module.into(),
            plugin: Some(plugin.into()),
            variant: Some(variant),
            outcome: Outcome::Pass,
            duration: Duration::ZERO,
            details: BTreeMap::new(),
        }
    }

    /// Entry for a module that could not be loaded
    pub fn import_failure(module: impl Into<String>, violation: Violation) -> Self {
        Self {
            module: module.into(),
            plugin: None,
            variant: None,
            outcome: Outcome::Fail(violation),
            duration: Duration::ZERO,
            details: BTreeMap::new(),
        }
    }

    /// `module.Class` for plugins, the module id for import failures
    pub fn identity(&self) -> String {
        match &self.plugin {
            Some(plugin) => format!("{}.{}", self.module, plugin),
            None => self.module.clone(),
        }
    }

    pub fn add_detail(&mut self, check: impl Into<String>, detail: impl Into<String>) {
        self.details.insert(check.into(), detail.into());
    }

    pub fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Conformant,
    NoModulesFound,
    NoPluginsFound,
    NonConformant,
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Conformant)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Conformant => write!(f, "CONFORMANT"),
            Verdict::NoModulesFound => write!(f, "NO MODULES FOUND"),
            Verdict::NoPluginsFound => write!(f, "NO PLUGINS FOUND"),
            Verdict::NonConformant => write!(f, "NON-CONFORMANT"),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub modules: usize,
    pub plugins: usize,
    pub passed: usize,
    pub failed: usize,
    pub verdict: Verdict,
}

impl Default for ReportSummary {
    fn default() -> Self {
        Self {
            modules: 0,
            plugins: 0,
            passed: 0,
            failed: 0,
            verdict: Verdict::NoModulesFound,
        }
    }
}

/// Complete conformance report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub source_root: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Duration,
    pub modules: Vec<String>,
    pub entries: Vec<PluginReport>,
    pub warnings: Vec<String>,
    pub summary: ReportSummary,
}

impl ConformanceReport {
    /// Create a new report
    pub fn new(source_root: impl Into<String>) -> Self {
        Self {
            source_root: source_root.into(),
            timestamp: Utc::now(),
            duration: Duration::ZERO,
            modules: Vec::new(),
            entries: Vec::new(),
            warnings: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    pub fn add_module(&mut self, module: impl Into<String>) {
        self.modules.push(module.into());
    }

    pub fn add_entry(&mut self, entry: PluginReport) {
        self.entries.push(entry);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Finalize the report and compute summary
    pub fn finalize(&mut self) {
        let plugins = self.entries.iter().filter(|e| e.plugin.is_some()).count();
        let failed = self.entries.iter().filter(|e| !e.is_pass()).count();
        let passed = self.entries.len() - failed;

        let verdict = if self.modules.is_empty() {
            Verdict::NoModulesFound
        } else if failed > 0 {
            Verdict::NonConformant
        } else if plugins == 0 {
            Verdict::NoPluginsFound
        } else {
            Verdict::Conformant
        };

        self.summary = ReportSummary {
            modules: self.modules.len(),
            plugins,
            passed,
            failed,
            verdict,
        };
    }

    pub fn verdict(&self) -> Verdict {
        self.summary.verdict
    }

    pub fn is_conformant(&self) -> bool {
        self.summary.verdict.is_success()
    }

    /// All violations, in report order
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.entries.iter().filter_map(|e| e.outcome.violation())
    }

    /// Generate a text report
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("╔════════════════════════════════════════════════════════════╗\n");
        output.push_str("║  Processor Contract Conformance Report                     ║\n");
        output.push_str("╠════════════════════════════════════════════════════════════╣\n");
        output.push_str(&format!("║  Source root: {:<44} ║\n", self.source_root));
        output.push_str(&format!(
            "║  Timestamp: {:<46} ║\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "║  Duration: {:<47} ║\n",
            format!("{:?}", self.duration)
        ));
        output.push_str("╠════════════════════════════════════════════════════════════╣\n");

        for warning in &self.warnings {
            output.push_str(&format!("║  Warning: {}\n", warning));
        }

        for entry in &self.entries {
            let status_icon = if entry.is_pass() { "✓" } else { "✗" };
            let variant = entry
                .variant
                .map(|v| v.to_string())
                .unwrap_or_else(|| "module".to_string());

            output.push_str(&format!(
                "║  {} {:<40} {:>15}\n",
                status_icon,
                entry.identity(),
                variant
            ));

            for (check, detail) in &entry.details {
                output.push_str(&format!("║      {}: {}\n", check, detail));
            }

            if let Some(violation) = entry.outcome.violation() {
                output.push_str(&format!("║      Error: {}\n", violation));
            }
        }

        output.push_str("╠════════════════════════════════════════════════════════════╣\n");
        output.push_str("║  Summary:                                                  ║\n");
        output.push_str(&format!(
            "║    Modules: {:<4} Plugins: {:<4} Passed: {:<4} Failed: {:<4}  ║\n",
            self.summary.modules, self.summary.plugins, self.summary.passed, self.summary.failed
        ));
        output.push_str("║                                                            ║\n");

        let icon = if self.is_conformant() { "✓" } else { "✗" };
        output.push_str(&format!(
            "║  Result: {} {:<47} ║\n",
            icon,
            self.summary.verdict.to_string()
        ));

        output.push_str("╚════════════════════════════════════════════════════════════╝\n");

        output
    }

    /// Generate JSON report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
