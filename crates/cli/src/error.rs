//! CLI errors

use nifikit_conformance::{ConfigError, DiscoveryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("invalid placeholder '{0}': expected NAME=VALUE")]
    Placeholder(String),

    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

pub type CliResult<T> = Result<T, CliError>;
