//! Plugin module registry
//!
//! Every plugin module registers a loader under its dotted identifier
//! (`package` or `package.file`). Loading a module runs its loader against the
//! host environment; the loader binds the host symbols it needs and returns
//! the processor classes it declares, including any it merely re-exports.

use crate::class::PluginClass;
use crate::environment::HostEnvironment;
use crate::error::ImportError;
use std::collections::BTreeMap;

/// Loads one module under a host environment
pub type ModuleLoader = fn(&HostEnvironment) -> Result<ModuleExports, ImportError>;

/// Classes a module makes visible
#[derive(Debug, Clone, Default)]
pub struct ModuleExports {
    classes: Vec<PluginClass>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: PluginClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn classes(&self) -> &[PluginClass] {
        &self.classes
    }
}

/// A module after its loader ran
#[derive(Debug, Clone)]
pub struct LoadedModule {
    id: String,
    exports: ModuleExports,
}

impl LoadedModule {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Every class visible in the module
    pub fn exported_classes(&self) -> &[PluginClass] {
        self.exports.classes()
    }

    /// Classes whose defining module is this module
    pub fn defined_classes(&self) -> impl Iterator<Item = &PluginClass> {
        self.exports
            .classes()
            .iter()
            .filter(move |class| class.module() == self.id)
    }
}

/// Explicit table of loadable plugin modules
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    loaders: BTreeMap<String, ModuleLoader>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader; a later registration under the same id wins
    pub fn register(&mut self, id: impl Into<String>, loader: ModuleLoader) -> &mut Self {
        let id = id.into();
        if self.loaders.insert(id.clone(), loader).is_some() {
            tracing::warn!(module = %id, "module loader registered twice; keeping the latest");
        }
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.loaders.contains_key(id)
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Load a module under `env`
    pub fn load(&self, id: &str, env: &HostEnvironment) -> Result<LoadedModule, ImportError> {
        let loader = self
            .loaders
            .get(id)
            .ok_or_else(|| ImportError::ModuleNotFound(id.to_string()))?;
        let exports = loader(env)?;
        Ok(LoadedModule {
            id: id.to_string(),
            exports,
        })
    }
}
