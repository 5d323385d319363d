//! Merging of freshly computed diagnostics into the stored list.

use std::time::Duration;

use serde::Serialize;
use sheetlint_plugin::Diagnostic;
use sheetlint_text::Span;
use tracing::error;

use crate::Watchdog;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    /// The merged list, sorted by start position.
    pub diagnostics: Vec<Diagnostic>,
    /// Old diagnostics carried over.
    pub kept: usize,
    /// Old diagnostics dropped because they touched a recomputed region.
    pub discarded: usize,
    /// New diagnostics inserted.
    pub added: usize,
    /// Whether the watchdog cut the merge short.
    pub timed_out: bool,
}

/// Replaces the diagnostics of recomputed regions.
///
/// `old` must be sorted by start, `regions` sorted and disjoint, and
/// `fresh[i]` the sorted diagnostics of `regions[i]`. An old diagnostic is
/// kept when it ends at or before the start of a region, or starts at or
/// after its end; anything reaching into a region is replaced by that
/// region's new diagnostics. Diagnostics outside every region pass through
/// unchanged and in order.
///
/// The merge runs under a [`Watchdog`]. If the budget runs out, the error is
/// logged with a snapshot of the inputs and the partial list built so far is
/// returned.
pub fn reconcile(
    old: &[Diagnostic],
    regions: &[Span],
    fresh: &[Vec<Diagnostic>],
    budget: Duration,
) -> Reconciliation {
    debug_assert_eq!(regions.len(), fresh.len(), "one diagnostic list per region");
    debug_assert!(
        old.windows(2).all(|w| w[0].span.from <= w[1].span.from),
        "reconcile: old diagnostics must be sorted by start"
    );
    debug_assert!(
        regions.windows(2).all(|w| w[0].to < w[1].from),
        "reconcile: regions must be sorted and disjoint"
    );

    let mut watchdog = Watchdog::start(budget);
    let mut out = Reconciliation {
        diagnostics: Vec::with_capacity(old.len() + fresh.iter().map(Vec::len).sum::<usize>()),
        ..Default::default()
    };
    let mut old_idx = 0;

    for (region, new_diags) in regions.iter().zip(fresh) {
        while old_idx < old.len() && old[old_idx].span.from < region.to {
            if watchdog.expired() {
                return abort(out, old, regions, fresh, &watchdog);
            }
            let diag = &old[old_idx];
            if diag.span.to <= region.from {
                out.diagnostics.push(diag.clone());
                out.kept += 1;
            } else {
                out.discarded += 1;
            }
            old_idx += 1;
        }
        if watchdog.expired() {
            return abort(out, old, regions, fresh, &watchdog);
        }
        out.diagnostics.extend(new_diags.iter().cloned());
        out.added += new_diags.len();
    }

    for diag in &old[old_idx..] {
        if watchdog.expired() {
            return abort(out, old, regions, fresh, &watchdog);
        }
        out.diagnostics.push(diag.clone());
        out.kept += 1;
    }

    out
}

#[derive(Serialize)]
struct Snapshot<'a> {
    new: &'a [Vec<Diagnostic>],
    old: Vec<Span>,
    regions: &'a [Span],
}

fn abort(
    mut out: Reconciliation,
    old: &[Diagnostic],
    regions: &[Span],
    fresh: &[Vec<Diagnostic>],
    watchdog: &Watchdog,
) -> Reconciliation {
    let snapshot = Snapshot {
        new: fresh,
        old: old.iter().map(|d| d.span).collect(),
        regions,
    };
    let snapshot = serde_json::to_string(&snapshot).unwrap_or_default();
    error!(
        budget_ms = watchdog.budget().as_millis() as u64,
        elapsed_ms = watchdog.elapsed().as_millis() as u64,
        produced = out.diagnostics.len(),
        snapshot = %snapshot,
        "Reconciliation exceeded its time budget; keeping partial results"
    );
    out.timed_out = true;
    out
}
