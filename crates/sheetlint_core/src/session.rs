//! The incremental lint pass.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use sheetlint_plugin::{Checker, Diagnostic};
use sheetlint_text::{Position, Span, TextBuffer, TextEdit};
use tracing::{debug, info, warn};

use crate::{
    BoundaryExpander, ChangeTracker, ConfigProvider, DEFAULT_BUDGET, DocumentLintState,
    LintDispatcher, LinterConfig, LinterError, Region, merge_spans, reconcile,
};

/// Summary of one lint pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    /// Whether the pass covered the whole document.
    pub first_run: bool,
    /// Regions linted successfully.
    pub regions: Vec<Span>,
    /// Regions whose checker failed; they are linted again next pass.
    pub failed: Vec<Span>,
    pub kept: usize,
    pub discarded: usize,
    pub added: usize,
    /// Whether reconciliation ran out of time.
    pub timed_out: bool,
    /// Fingerprint of the config snapshot the pass used.
    pub config_fingerprint: String,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl PassReport {
    /// Returns true if the pass had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.regions.is_empty() && self.failed.is_empty()
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Incremental lint state of one document.
///
/// Edits are recorded as they happen; [`LintSession::lint`] then relints
/// only the block-aligned regions around them and merges the results into
/// the stored diagnostics. The first pass lints the whole document.
///
/// Passes take `&mut self`, so at most one runs per session at a time.
pub struct LintSession {
    checker: Arc<Checker>,
    provider: Arc<dyn ConfigProvider>,
    expander: BoundaryExpander,
    tracker: ChangeTracker,
    state: DocumentLintState,
    watchdog_budget: Duration,
}

impl LintSession {
    /// Creates a session that has not linted anything yet.
    pub fn new(checker: impl Into<Arc<Checker>>, provider: Arc<dyn ConfigProvider>) -> Self {
        Self {
            checker: checker.into(),
            provider,
            expander: BoundaryExpander::new(),
            tracker: ChangeTracker::new(),
            state: DocumentLintState::new(),
            watchdog_budget: DEFAULT_BUDGET,
        }
    }

    /// Creates a session with the checker and budget from `config`.
    pub fn from_config(config: &LinterConfig) -> Result<Self, LinterError> {
        let checker = config.build_checker()?;
        Ok(Self::new(checker, Arc::new(config.clone()))
            .with_watchdog_budget(config.watchdog_budget()))
    }

    pub fn with_watchdog_budget(mut self, budget: Duration) -> Self {
        self.watchdog_budget = budget;
        self
    }

    pub fn with_expander(mut self, expander: BoundaryExpander) -> Self {
        self.expander = expander;
        self
    }

    /// Replaces the config source; takes effect on the next pass.
    pub fn set_provider(&mut self, provider: Arc<dyn ConfigProvider>) {
        self.provider = provider;
    }

    /// Replaces the checker and forgets all results.
    pub fn set_checker(&mut self, checker: impl Into<Arc<Checker>>) {
        self.checker = checker.into();
        self.reset();
    }

    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    /// Records a changed span, in current document coordinates.
    pub fn record_change(&mut self, span: Span) {
        self.tracker.record_edit(span);
    }

    /// Records a text edit and moves stored positions through it.
    pub fn apply_edit(&mut self, edit: &TextEdit) {
        self.state.map_through(edit);
        self.tracker.record_text_edit(edit);
    }

    /// Forgets diagnostics and pending changes; the next pass lints everything.
    pub fn reset(&mut self) {
        self.state.reset();
        self.tracker.drain();
    }

    /// Current diagnostics, sorted by start position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.state.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.state.diagnostics
    }

    pub fn state(&self) -> &DocumentLintState {
        &self.state
    }

    /// Changes recorded since the last pass.
    pub fn pending_changes(&self) -> &[Span] {
        self.tracker.pending()
    }

    /// Runs one pass over `buffer`.
    ///
    /// The config is read once, before anything is dispatched. Regions whose
    /// checker fails keep their old diagnostics and are queued for the next
    /// pass.
    pub async fn lint<B: TextBuffer + ?Sized>(&mut self, buffer: &B) -> PassReport {
        let started = Instant::now();
        let config = self.provider.current();
        let first_run = !self.state.has_run;
        let changes = self.tracker.drain();

        let spans = if first_run {
            vec![Span::new(Position::default(), buffer.end())]
        } else {
            self.expander.expand_all(buffer, &merge_spans(changes))
        };

        let mut report = PassReport {
            first_run,
            config_fingerprint: config.fingerprint().to_string(),
            ..Default::default()
        };
        if spans.is_empty() {
            report.elapsed = started.elapsed();
            return report;
        }

        let regions: Vec<Region> = spans
            .iter()
            .map(|span| Region::capture(buffer, *span))
            .collect();
        let outcomes = LintDispatcher::new(&self.checker, config)
            .dispatch(&regions)
            .await;

        let mut fresh = Vec::with_capacity(regions.len());
        for (region, outcome) in regions.into_iter().zip(outcomes) {
            match outcome {
                Ok(diagnostics) => {
                    report.regions.push(region.span);
                    fresh.push(diagnostics);
                }
                Err(_) => {
                    self.tracker.record_edit(region.span);
                    report.failed.push(region.span);
                }
            }
        }
        if !report.failed.is_empty() {
            warn!(
                failed = report.failed.len(),
                "Some regions could not be linted; retrying them next pass"
            );
        }

        let merged = reconcile(
            &self.state.diagnostics,
            &report.regions,
            &fresh,
            self.watchdog_budget,
        );
        report.kept = merged.kept;
        report.discarded = merged.discarded;
        report.added = merged.added;
        report.timed_out = merged.timed_out;

        self.state.diagnostics = merged.diagnostics;
        self.state.last_regions = report.regions.clone();
        if first_run && report.failed.is_empty() {
            self.state.has_run = true;
        }

        report.elapsed = started.elapsed();
        if first_run {
            info!(
                diagnostics = self.state.diagnostics.len(),
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Full lint pass finished"
            );
        } else {
            debug!(
                regions = report.regions.len(),
                kept = report.kept,
                discarded = report.discarded,
                added = report.added,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Incremental lint pass finished"
            );
        }
        report
    }
}

impl std::fmt::Debug for LintSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintSession")
            .field("checker", &self.checker.kind())
            .field("pending", &self.tracker.len())
            .field("diagnostics", &self.state.diagnostics.len())
            .field("has_run", &self.state.has_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticConfigProvider;
    use pretty_assertions::assert_eq;
    use sheetlint_plugin::RuleChecker;
    use sheetlint_text::LineBuffer;

    fn session() -> LintSession {
        LintSession::new(
            Checker::Rules(RuleChecker::builtin()),
            Arc::new(StaticConfigProvider::default()),
        )
    }

    #[tokio::test]
    async fn test_first_pass_lints_whole_document() {
        let buffer = LineBuffer::new("a { }\nb { top: 0 }\nc { }");
        let mut session = session();

        let report = session.lint(&buffer).await;

        assert!(report.first_run);
        assert_eq!(report.regions, vec![Span::new(Position::default(), buffer.end())]);
        assert_eq!(session.diagnostics().len(), 2);
        assert!(session.state().has_run);
    }

    #[tokio::test]
    async fn test_second_pass_without_changes_is_noop() {
        let buffer = LineBuffer::new("a { }");
        let mut session = session();
        session.lint(&buffer).await;
        let before = session.diagnostics().to_vec();

        let report = session.lint(&buffer).await;

        assert!(report.is_noop());
        assert!(!report.first_run);
        assert_eq!(session.diagnostics(), before.as_slice());
    }

    #[tokio::test]
    async fn test_edit_replaces_diagnostics_of_touched_block() {
        let mut buffer = LineBuffer::new("a { }\nb { top: 0 }");
        let mut session = session();
        session.lint(&buffer).await;
        assert_eq!(session.diagnostics().len(), 1);

        let edit = TextEdit::new(
            Span::new(Position::new(0, 3), Position::new(0, 4)),
            " color: red ",
        );
        buffer.apply(&edit);
        session.apply_edit(&edit);
        let report = session.lint(&buffer).await;

        assert!(!report.first_run);
        assert_eq!(report.discarded, 1);
        assert!(session.diagnostics().is_empty());
    }

    #[test]
    fn test_session_debug() {
        let text = format!("{:?}", session());
        assert!(text.contains("LintSession"));
        assert!(text.contains("Rules"));
    }
}
