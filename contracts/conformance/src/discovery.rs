//! Plugin module discovery
//!
//! Walks a source root and yields one module identifier per plugin-bearing
//! source unit: `pkg` for a package directory carrying `mod.rs`, and
//! `pkg.file` for every other top-level `.rs` file in it. Nothing is loaded.

use crate::error::DiscoveryError;
use std::collections::VecDeque;
use std::fs::{self, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

/// File that marks a directory as a package root
pub const PACKAGE_ROOT_FILE: &str = "mod.rs";

const SOURCE_EXTENSION: &str = "rs";

/// Discovery over one source root
#[derive(Debug, Clone)]
pub struct ModuleDiscovery {
    root: PathBuf,
}

impl ModuleDiscovery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root exists as a directory
    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Start a fresh walk.
    ///
    /// An absent root yields nothing. A root that exists but cannot be listed
    /// is an error.
    pub fn iter(&self) -> Result<DiscoveredModules, DiscoveryError> {
        if !self.root_exists() {
            tracing::warn!(root = %self.root.display(), "source root not found");
            return Ok(DiscoveredModules::empty());
        }

        let entries = fs::read_dir(&self.root).map_err(|source| DiscoveryError {
            path: self.root.clone(),
            source,
        })?;

        Ok(DiscoveredModules {
            entries: Some(entries),
            pending: VecDeque::new(),
        })
    }
}

/// Lazy walk over a source root; each package directory is read when reached
#[derive(Debug)]
pub struct DiscoveredModules {
    entries: Option<ReadDir>,
    pending: VecDeque<String>,
}

impl DiscoveredModules {
    fn empty() -> Self {
        Self {
            entries: None,
            pending: VecDeque::new(),
        }
    }
}

impl Iterator for DiscoveredModules {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(id) = self.pending.pop_front() {
                return Some(id);
            }

            let entry = match self.entries.as_mut()?.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "skipping unreadable entry under source root");
                    continue;
                }
                None => {
                    self.entries = None;
                    return None;
                }
            };

            let path = entry.path();
            let Some(package) = package_name(&path) else {
                continue;
            };

            match package_modules(&path, package) {
                Ok(ids) => self.pending.extend(ids),
                Err(e) => {
                    tracing::warn!(package, error = %e, "skipping unreadable package directory");
                }
            }
        }
    }
}

/// Name of a candidate package directory, or `None` if it should be skipped
fn package_name(path: &Path) -> Option<&str> {
    if !path.is_dir() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    if name.starts_with('_') || name.starts_with('.') {
        return None;
    }
    Some(name)
}

fn package_modules(dir: &Path, package: &str) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();

    if dir.join(PACKAGE_ROOT_FILE).is_file() {
        ids.push(package.to_string());
    }

    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name == PACKAGE_ROOT_FILE || file_name.starts_with('_') {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            children.push(format!("{package}.{stem}"));
        }
    }
    children.sort();
    ids.extend(children);

    Ok(ids)
}
