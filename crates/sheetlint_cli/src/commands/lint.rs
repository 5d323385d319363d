//! Lint command implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use sheetlint_core::{
    Checker, ConfigProvider, Diagnostic, LintSession, LinterConfig, LinterError, PassReport,
    Severity,
};
use sheetlint_text::LineBuffer;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cli::{Cli, OutputFormat};
use crate::output::output_results;
use crate::utils::create_tokio_runtime;

/// File extensions picked up when walking a directory.
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css", "scss", "less"];

/// Lint result of one file.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub report: PassReport,
}

impl FileResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Everything a worker needs to lint one file.
struct LintJob<'a> {
    checker: Arc<Checker>,
    provider: Arc<dyn ConfigProvider>,
    config: &'a LinterConfig,
    handle: &'a Handle,
}

impl LintJob<'_> {
    fn run(&self, path: &Path) -> std::result::Result<FileResult, LinterError> {
        let text = std::fs::read_to_string(path)?;
        let buffer = LineBuffer::new(text);
        let mut session = LintSession::new(self.checker.clone(), self.provider.clone())
            .with_watchdog_budget(self.config.watchdog_budget());

        let report = self.handle.block_on(session.lint(&buffer));
        if !report.failed.is_empty() {
            return Err(LinterError::internal("checker failed"));
        }
        debug!(
            path = %path.display(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Linted file"
        );

        Ok(FileResult {
            path: path.to_path_buf(),
            diagnostics: session.into_diagnostics(),
            report,
        })
    }
}

pub fn run_lint(
    cli: &Cli,
    paths: &[PathBuf],
    format: OutputFormat,
    timings: bool,
) -> Result<bool> {
    let config = load_config(cli)?;
    let checker = Arc::new(config.build_checker().into_diagnostic()?);
    let files = collect_files(paths)?;
    if files.is_empty() {
        warn!("No stylesheet files found");
    }

    let runtime = create_tokio_runtime()?;
    let job = LintJob {
        checker,
        provider: Arc::new(config.clone()),
        config: &config,
        handle: runtime.handle(),
    };

    let outcomes: Vec<_> = files
        .par_iter()
        .map(|path| (path, job.run(path)))
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => failures.push((path, e)),
        }
    }

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    let has_errors = output_results(&results, format, timings)?;

    Ok(has_errors || !failures.is_empty())
}

/// Loads the config named on the command line, or the one found in the
/// current directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<LinterConfig> {
    if let Some(ref path) = cli.config {
        return LinterConfig::from_file(path).into_diagnostic();
    }
    if let Some(path) = LinterConfig::discover(".") {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}

/// Expands the given paths into a sorted, deduplicated list of files.
///
/// Files named explicitly are always linted; directories contribute the
/// files with a stylesheet extension.
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.into_diagnostic()?;
                if entry.file_type().is_file() && is_stylesheet(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            return Err(miette::miette!("No such file or directory: {}", path.display()));
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| STYLESHEET_EXTENSIONS.contains(&ext))
}
