//! Harness errors

use std::path::PathBuf;
use thiserror::Error;

/// The discovery root exists but cannot be enumerated. Aborts the run.
#[derive(Debug, Error)]
#[error("cannot read source root {}: {source}", path.display())]
pub struct DiscoveryError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Harness configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
