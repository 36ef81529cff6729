//! `nifikit list`: show discovered modules and the plugins they define

use crate::error::CliResult;
use crate::output::{print_error, print_warning};
use clap::Args;
use colored::*;
use nifikit_conformance::{ConformanceConfig, ModuleDiscovery};
use nifikit_host_api::HostEnvironment;
use nifikit_processors::registry;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory scanned for plugin modules
    #[arg(short, long, env = "NIFI_SRC_ROOT")]
    pub root: Option<PathBuf>,
}

pub fn execute(args: ListArgs, config: ConformanceConfig) -> CliResult<()> {
    let root = args.root.unwrap_or(config.src_root);
    let discovery = ModuleDiscovery::new(&root);
    if !discovery.root_exists() {
        print_warning(&format!("source root {} does not exist", root.display()));
        return Ok(());
    }

    let env = HostEnvironment::stub();
    let registry = registry();

    let mut modules: Vec<String> = discovery.iter()?.collect();
    modules.sort();

    for module in modules {
        match registry.load(&module, &env) {
            Ok(loaded) => {
                println!("{}", module.bold());
                for class in loaded.defined_classes() {
                    let version = class
                        .details()
                        .map(|d| d.version.as_str())
                        .unwrap_or("-");
                    println!(
                        "  {} {} {}",
                        class.name(),
                        format!("[{}]", class.variant()).cyan(),
                        version.dimmed()
                    );
                }
            }
            Err(e) => print_error(&format!("{}: {}", module, e)),
        }
    }

    Ok(())
}
