//! Output formatting module

mod json;
mod text;

use miette::Result;

use crate::cli::OutputFormat;
use crate::commands::lint::FileResult;

/// Prints the results; returns whether any file has error diagnostics.
pub fn output_results(results: &[FileResult], format: OutputFormat, timings: bool) -> Result<bool> {
    let has_errors = results.iter().any(|r| r.has_errors());

    match format {
        OutputFormat::Json => json::output_json(results)?,
        OutputFormat::Text => text::output_text(results, timings),
    }

    Ok(has_errors)
}
