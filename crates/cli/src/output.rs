//! Output formatting utilities

use colored::*;
use nifikit_conformance::{ConformanceReport, PluginReport, Verdict};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn print_entry(entry: &PluginReport, verbose: bool) {
    let status = if entry.is_pass() {
        "✓".green()
    } else {
        "✗".red()
    };
    let variant = entry
        .variant
        .map(|v| v.to_string())
        .unwrap_or_else(|| "module".to_string());

    println!(
        "  {} {} {}",
        status,
        entry.identity().bold(),
        format!("({})", variant).dimmed()
    );

    if verbose {
        for (check, detail) in &entry.details {
            println!("      {}: {}", check, detail.dimmed());
        }
    }

    if let Some(violation) = entry.outcome.violation() {
        println!("      {}", violation.to_string().red());
    }
}

/// Colored rendering of a conformance report
pub fn print_report(report: &ConformanceReport, verbose: bool) {
    println!("{}", "Processor Contract Conformance".bold());
    println!("Source root: {}", report.source_root);
    println!("Modules: {}", report.modules.len());
    println!();

    for warning in &report.warnings {
        print_warning(warning);
    }

    for entry in &report.entries {
        print_entry(entry, verbose);
    }

    let summary = &report.summary;
    println!();
    println!(
        "Plugins: {}  Passed: {}  Failed: {}  ({:?})",
        summary.plugins,
        summary.passed.to_string().green(),
        summary.failed.to_string().red(),
        report.duration
    );

    let verdict = summary.verdict.to_string();
    match summary.verdict {
        Verdict::Conformant => print_success(&verdict),
        Verdict::NoModulesFound | Verdict::NoPluginsFound => print_warning(&verdict),
        Verdict::NonConformant => print_error(&verdict),
    }
}
