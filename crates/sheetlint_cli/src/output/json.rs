//! JSON output formatter

use miette::{IntoDiagnostic, Result};

use crate::commands::lint::FileResult;

pub fn render_json(results: &[FileResult]) -> serde_json::Value {
    let output: Vec<_> = results
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "diagnostics": r.diagnostics,
            })
        })
        .collect();
    serde_json::Value::Array(output)
}

pub fn output_json(results: &[FileResult]) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&render_json(results)).into_diagnostic()?
    );
    Ok(())
}
