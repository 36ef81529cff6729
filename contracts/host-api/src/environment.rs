//! Host capability environment
//!
//! Plugin modules bind to host modules (`nifiapi.*`) when they load, so the
//! environment has to be installed before any module loader runs. The
//! environment is an explicit value threaded into every loader and factory;
//! there is no hidden process-wide state.

use crate::error::ImportError;
use crate::http::{HttpClient, OfflineHttpClient};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Root package of the host API
pub const HOST_PACKAGE: &str = "nifiapi";

/// One bound host module and the symbols it exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostModule {
    name: String,
    exports: BTreeSet<String>,
}

impl HostModule {
    pub fn new<I, S>(name: impl Into<String>, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            exports: exports.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exports(&self, symbol: &str) -> bool {
        self.exports.contains(symbol)
    }
}

fn is_host_binding(name: &str) -> bool {
    name == HOST_PACKAGE
        || name
            .strip_prefix(HOST_PACKAGE)
            .is_some_and(|rest| rest.starts_with('.'))
}

fn stub_modules() -> Vec<HostModule> {
    vec![
        HostModule::new(HOST_PACKAGE, Vec::<String>::new()),
        HostModule::new(
            "nifiapi.flowfiletransform",
            ["FlowFileTransform", "FlowFileTransformResult"],
        ),
        HostModule::new(
            "nifiapi.flowfilesource",
            ["FlowFileSource", "FlowFileSourceResult"],
        ),
        HostModule::new(
            "nifiapi.recordtransform",
            ["RecordTransform", "RecordTransformResult"],
        ),
        HostModule::new("nifiapi.relationship", ["Relationship"]),
        HostModule::new(
            "nifiapi.properties",
            [
                "PropertyDescriptor",
                "StandardValidators",
                "ExpressionLanguageScope",
            ],
        ),
    ]
}

/// The set of host modules visible to plugin code, plus host capabilities
pub struct HostEnvironment {
    bindings: BTreeMap<String, HostModule>,
    http: Arc<dyn HttpClient>,
    installs: u32,
}

impl HostEnvironment {
    /// An environment with nothing bound
    pub fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
            http: Arc::new(OfflineHttpClient),
            installs: 0,
        }
    }

    /// A freshly installed stand-in environment
    pub fn stub() -> Self {
        let mut env = Self::new();
        env.install();
        env
    }

    /// Bind the stand-in host modules.
    ///
    /// Any earlier `nifiapi` bindings are dropped first, so calling this again
    /// never leaves stale or duplicate bindings behind.
    pub fn install(&mut self) {
        let stale: Vec<String> = self
            .bindings
            .keys()
            .filter(|name| is_host_binding(name))
            .cloned()
            .collect();
        for name in &stale {
            self.bindings.remove(name);
        }

        for module in stub_modules() {
            self.bindings.insert(module.name.clone(), module);
        }
        self.installs += 1;

        tracing::debug!(
            removed = stale.len(),
            bound = self.bindings.len(),
            installs = self.installs,
            "installed host stub modules"
        );
    }

    /// Whether `install` has run at least once
    pub fn is_installed(&self) -> bool {
        self.installs > 0
    }

    /// Bind a module directly, replacing any module of the same name
    pub fn bind(&mut self, module: HostModule) -> Option<HostModule> {
        self.bindings.insert(module.name.clone(), module)
    }

    pub fn unbind(&mut self, name: &str) -> Option<HostModule> {
        self.bindings.remove(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &HostModule> {
        self.bindings.values()
    }

    /// Resolve `from module import symbol`
    pub fn import(&self, module: &str, symbol: &str) -> Result<(), ImportError> {
        let bound = self
            .bindings
            .get(module)
            .ok_or_else(|| ImportError::HostModuleUnbound(module.to_string()))?;
        if !bound.exports(symbol) {
            return Err(ImportError::SymbolNotExported {
                module: module.to_string(),
                symbol: symbol.to_string(),
            });
        }
        Ok(())
    }

    /// Replace the HTTP capability handed to processors
    pub fn with_http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http = client;
        self
    }

    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("installs", &self.installs)
            .finish()
    }
}
