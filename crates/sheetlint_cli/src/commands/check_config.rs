//! Check-config command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use sheetlint_core::LinterConfig;

use crate::cli::Cli;

/// Loads and validates the config, then builds its checker.
///
/// Prints a summary on success; any problem is returned as an error.
pub fn run_check_config(cli: &Cli) -> Result<()> {
    let path: Option<PathBuf> = cli.config.clone().or_else(|| LinterConfig::discover("."));
    let Some(path) = path else {
        println!("No config file found; defaults apply");
        return Ok(());
    };

    let config = LinterConfig::from_file(&path).into_diagnostic()?;
    config.build_checker().into_diagnostic()?;

    println!("{}: ok", path.display());
    println!("  checker: {}", config.checker);
    println!("  rules configured: {}", config.rules.len());
    println!("  watchdog: {}ms", config.watchdog_ms);
    println!("  debounce: {}ms", config.debounce_ms);
    println!("  fingerprint: {}", config.snapshot().fingerprint());
    Ok(())
}
