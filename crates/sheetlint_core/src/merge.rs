//! Coalescing of spans into disjoint regions.

use sheetlint_text::Span;

/// Merges spans into a sorted list of disjoint, non-adjacent spans.
///
/// Spans are normalized, then swept in order of their start. Spans that
/// overlap or touch the current run extend it; a span starting strictly
/// after the run's end opens a new one. Zero-width spans are kept as
/// zero-width runs unless something covers or touches them.
pub fn merge_spans(spans: impl IntoIterator<Item = Span>) -> Vec<Span> {
    let mut sorted: Vec<Span> = spans.into_iter().map(Span::normalized).collect();
    sorted.sort_by_key(|s| s.from);

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(current) if span.from <= current.to => {
                if span.to > current.to {
                    current.to = span.to;
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}
