//! nifikit CLI - processor contract conformance from the terminal
//!
//! - `check` runs the conformance harness over a source root and exits
//!   non-zero unless the verdict is conformant
//! - `list` shows which modules are discovered and the plugins they define

use clap::{Parser, Subcommand};
use nifikit_conformance::ConformanceConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{check, list};
use error::CliResult;

/// nifikit CLI application
#[derive(Parser)]
#[command(name = "nifikit")]
#[command(about = "nifikit - processor contract conformance", long_about = None)]
#[command(version)]
struct Cli {
    /// Harness configuration file (TOML)
    #[arg(short, long, env = "NIFIKIT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run conformance checks
    Check(check::CheckArgs),

    /// List discovered modules and plugins
    List(list::ListArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ConformanceConfig::load(cli.config.as_deref())?;
    tracing::debug!(src_root = %config.src_root.display(), "configuration loaded");

    match cli.command {
        Commands::Check(args) => {
            if !check::execute(args, config, cli.verbose)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::List(args) => list::execute(args, config),
    }
}
