//! Accumulates the spans touched by edits since the last pass.

use sheetlint_text::{Span, TextEdit};

/// Records edited spans between lint passes.
///
/// Spans are kept in arrival order, may overlap, and may be zero width.
/// [`ChangeTracker::drain`] hands them to a pass and starts a fresh list.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    spans: Vec<Span>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a span in post-edit coordinates.
    ///
    /// Inverted spans are normalized.
    pub fn record_edit(&mut self, span: Span) {
        self.spans.push(span.normalized());
    }

    /// Records a text edit.
    ///
    /// Spans already recorded are moved through the edit first, so the whole
    /// list stays in the coordinates of the current text.
    pub fn record_text_edit(&mut self, edit: &TextEdit) {
        self.map_through(edit);
        self.spans.push(edit.inserted_span());
    }

    /// Moves every recorded span through `edit` without recording it.
    pub fn map_through(&mut self, edit: &TextEdit) {
        for span in &mut self.spans {
            *span = edit.map_span(*span);
        }
    }

    /// Returns the recorded spans and resets the tracker.
    pub fn drain(&mut self) -> Vec<Span> {
        std::mem::take(&mut self.spans)
    }

    /// Recorded spans, oldest first.
    pub fn pending(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }
}
