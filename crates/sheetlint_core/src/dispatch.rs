//! Fans regions out to the checker and normalizes what comes back.

use futures_util::future::join_all;
use sheetlint_plugin::{Checker, ConfigSnapshot, Diagnostic, PluginError, RawIssue, Severity};
use sheetlint_text::{Position, Span};
use tracing::{debug, warn};

use crate::Region;

/// Result of linting one region.
pub type RegionOutcome = Result<Vec<Diagnostic>, PluginError>;

/// Runs one checker over a set of regions with a single config snapshot.
#[derive(Debug)]
pub struct LintDispatcher<'a> {
    checker: &'a Checker,
    config: ConfigSnapshot,
}

impl<'a> LintDispatcher<'a> {
    pub fn new(checker: &'a Checker, config: ConfigSnapshot) -> Self {
        Self { checker, config }
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    /// Lints every region and waits for all of them.
    ///
    /// All checker invocations are started before any is awaited, so
    /// asynchronous checkers run concurrently. Outcomes come back in region
    /// order. Diagnostics are in absolute coordinates, sorted by start, and
    /// never start past their region's end.
    pub async fn dispatch(&self, regions: &[Region]) -> Vec<RegionOutcome> {
        let started: Vec<_> = regions
            .iter()
            .map(|region| self.checker.lint(&region.text, &self.config))
            .collect();

        let resolved = join_all(started.into_iter().map(|output| async move {
            match output {
                Ok(output) => output.resolve().await,
                Err(e) => Err(e),
            }
        }))
        .await;

        regions
            .iter()
            .zip(resolved)
            .map(|(region, outcome)| {
                let issues = outcome.inspect_err(|e| {
                    warn!(region = ?region.span, "Checker failed: {}", e);
                })?;
                let mut diagnostics: Vec<Diagnostic> = issues
                    .into_iter()
                    .filter_map(|issue| normalize(region, issue))
                    .collect();
                diagnostics.sort_by_key(|d| d.span.from);
                debug!(region = ?region.span, count = diagnostics.len(), "Region linted");
                Ok(diagnostics)
            })
            .collect()
    }
}

/// Converts a region-relative issue into an absolute diagnostic.
///
/// Issues without a usable 1-based position are dropped, as are issues on a
/// line the region does not have or past the end of their line. Unknown
/// severities become warnings.
pub fn normalize(region: &Region, issue: RawIssue) -> Option<Diagnostic> {
    let (Some(line), Some(column)) = (issue.line, issue.column) else {
        warn!(text = %issue.message, "Dropping issue without a position");
        return None;
    };
    let Some(from) = locate(region, line, column) else {
        warn!(
            line,
            column,
            region = ?region.span,
            text = %issue.message,
            "Dropping issue with an invalid position"
        );
        return None;
    };
    if from < region.span.from || from > region.span.to {
        warn!(line, column, region = ?region.span, "Dropping issue outside its region");
        return None;
    }

    let to = match (issue.end_line, issue.end_column) {
        (Some(end_line), Some(end_column)) => locate(region, end_line, end_column)
            .filter(|to| *to > from)
            .unwrap_or(from.advance(1)),
        _ => from.advance(1),
    };

    Some(Diagnostic {
        span: Span::new(from, to),
        message: issue.message,
        severity: Severity::parse(&issue.severity).unwrap_or_default(),
        rule_id: issue.rule,
    })
}

/// Resolves a 1-based line/column against the region's text.
///
/// The column may point one past the last char of its line.
fn locate(region: &Region, line: u32, column: u32) -> Option<Position> {
    let line_text = region.text.split('\n').nth(line.checked_sub(1)? as usize)?;
    let column_idx = column.checked_sub(1)? as usize;
    if column_idx > line_text.chars().count() {
        return None;
    }
    to_absolute(region.span.from, line, column)
}

/// Maps a 1-based line/column relative to `origin` onto the document.
///
/// The column is offset by the origin's column only on the region's first line.
fn to_absolute(origin: Position, line: u32, column: u32) -> Option<Position> {
    let line = line.checked_sub(1)?;
    let column = column.checked_sub(1)?;
    let offset = if line == 0 { origin.column } else { 0 };
    Some(Position::new(
        origin.line.checked_add(line)?,
        column.checked_add(offset)?,
    ))
}
