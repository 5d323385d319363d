//! Widening of regions to enclosing rule blocks.
//!
//! A change inside a rule block can affect diagnostics anywhere in that
//! block and its neighbours, so each merged span is widened to the block
//! terminators around it before linting.

use sheetlint_text::{Position, Span, TextBuffer};

use crate::merge_spans;

/// Token that closes a rule block.
pub const BLOCK_TERMINATOR: &str = "}";

/// Terminators searched backward from a span's start.
pub const TERMINATORS_BEFORE: usize = 2;

/// Terminators searched forward from a span's end.
pub const TERMINATORS_AFTER: usize = 3;

/// Widens spans to block boundaries.
#[derive(Debug, Clone)]
pub struct BoundaryExpander {
    terminator: String,
    before: usize,
    after: usize,
}

impl BoundaryExpander {
    pub fn new() -> Self {
        Self {
            terminator: BLOCK_TERMINATOR.to_string(),
            before: TERMINATORS_BEFORE,
            after: TERMINATORS_AFTER,
        }
    }

    /// Uses another terminator token.
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    /// Widens one span.
    ///
    /// The start moves to the end of the second terminator before
    /// `span.from`, or to the document start if there are fewer. The end
    /// moves to the end of the third terminator at or after `span.to`, or to
    /// the document end if there are fewer. The result always encloses the
    /// input.
    pub fn expand<B: TextBuffer + ?Sized>(&self, buffer: &B, span: Span) -> Span {
        let span = span.normalized();
        let from = self
            .nth_prev(buffer, span.from)
            .map_or(Position::default(), |m| m.to.min(span.from));
        let to = self
            .nth_next(buffer, span.to)
            .map_or_else(|| buffer.end().max(span.to), |m| m.to.max(span.to));
        Span::new(from, to)
    }

    /// Widens every span, then merges the results again.
    ///
    /// Widened spans can overlap even when the inputs were disjoint.
    pub fn expand_all<B: TextBuffer + ?Sized>(&self, buffer: &B, spans: &[Span]) -> Vec<Span> {
        merge_spans(spans.iter().map(|s| self.expand(buffer, *s)))
    }

    fn nth_prev<B: TextBuffer + ?Sized>(&self, buffer: &B, start: Position) -> Option<Span> {
        let mut cursor = start;
        let mut found = None;
        for _ in 0..self.before {
            let m = buffer.find_prev(&self.terminator, cursor)?;
            cursor = m.from;
            found = Some(m);
        }
        found
    }

    fn nth_next<B: TextBuffer + ?Sized>(&self, buffer: &B, start: Position) -> Option<Span> {
        let mut cursor = start;
        let mut found = None;
        for _ in 0..self.after {
            let m = buffer.find_next(&self.terminator, cursor)?;
            cursor = m.to;
            found = Some(m);
        }
        found
    }
}

impl Default for BoundaryExpander {
    fn default() -> Self {
        Self::new()
    }
}
