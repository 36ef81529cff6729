//! `nifikit check`: run the conformance harness

use crate::error::{CliError, CliResult};
use crate::output::{print_info, print_report, OutputFormat};
use clap::Args;
use nifikit_conformance::{ConformanceConfig, ConformanceReport, TestHarness};
use nifikit_host_api::HostEnvironment;
use nifikit_processors::{registry, ReqwestHttpClient};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory scanned for plugin modules
    #[arg(short, long, env = "NIFI_SRC_ROOT")]
    pub root: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Placeholder property value (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub placeholders: Vec<String>,

    /// Let processors reach the network during the smoke invocation
    #[arg(long)]
    pub live: bool,
}

fn parse_placeholder(raw: &str) -> CliResult<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::Placeholder(raw.to_string())),
    }
}

/// Apply command-line overrides on top of the loaded configuration
pub fn configure(mut config: ConformanceConfig, args: &CheckArgs) -> CliResult<ConformanceConfig> {
    if let Some(root) = &args.root {
        config = config.with_src_root(root.clone());
    }
    for raw in &args.placeholders {
        let (name, value) = parse_placeholder(raw)?;
        config = config.with_placeholder(name, value);
    }
    Ok(config)
}

fn run(config: ConformanceConfig, live: bool) -> CliResult<ConformanceReport> {
    let mut harness = TestHarness::with_config(registry(), config);
    if live {
        let http = ReqwestHttpClient::new().map_err(|e| CliError::Http(e.to_string()))?;
        harness = harness.with_environment(HostEnvironment::stub().with_http_client(Arc::new(http)));
    }
    Ok(harness.run()?)
}

/// Execute the check; returns whether the run was conformant
pub fn execute(args: CheckArgs, config: ConformanceConfig, verbose: bool) -> CliResult<bool> {
    let config = configure(config, &args)?;
    if args.output == OutputFormat::Text && args.live {
        print_info("live mode: processors may call external endpoints");
    }

    let report = run(config, args.live)?;
    match args.output {
        OutputFormat::Text => print_report(&report, verbose),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(report.is_conformant())
}
