//! Position and span types for document coordinates.
//!
//! Lines and columns are both 0-indexed. Columns count Unicode scalar
//! values, not bytes, so positions stay valid for any UTF-8 content.

use serde::{Deserialize, Serialize};

/// A position in a document.
///
/// Ordered lexicographically by `(line, column)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,
    /// Column number (0-indexed, in chars).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the position `n` columns to the right on the same line.
    ///
    /// Saturates at `u32::MAX`.
    #[inline]
    pub const fn advance(self, n: u32) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add(n),
        }
    }
}

/// A half-open `[from, to)` range of a document.
///
/// Spans reported by external sources may arrive inverted; call
/// [`Span::normalized`] before relying on `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive).
    pub from: Position,
    /// End position (exclusive).
    pub to: Position,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Creates an empty span at `pos`.
    #[inline]
    pub const fn point(pos: Position) -> Self {
        Self { from: pos, to: pos }
    }

    /// Returns the span with `from` and `to` swapped if it was inverted.
    #[inline]
    pub fn normalized(self) -> Self {
        if self.from > self.to {
            Self {
                from: self.to,
                to: self.from,
            }
        } else {
            self
        }
    }

    /// Returns true if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Returns true if this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.from <= pos && pos < self.to
    }

    /// Returns true if `other` lies within `[from, to]`, boundaries included.
    #[inline]
    pub fn encloses(&self, other: &Span) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    /// Merges two spans into one that covers both.
    #[inline]
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}

/// A replacement of `range` (in pre-edit coordinates) by `text`.
///
/// Used to carry positions computed before the edit over to the
/// post-edit document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Replaced range, in coordinates of the document before the edit.
    pub range: Span,
    /// Inserted text.
    pub text: String,
}

impl TextEdit {
    /// Creates a new edit. Inverted ranges are normalized.
    pub fn new(range: Span, text: impl Into<String>) -> Self {
        Self {
            range: range.normalized(),
            text: text.into(),
        }
    }

    /// Creates a pure insertion at `at`.
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::new(Span::point(at), text)
    }

    /// Creates a deletion of `range`.
    pub fn delete(range: Span) -> Self {
        Self::new(range, String::new())
    }

    /// Returns the position right after the inserted text, in post-edit coordinates.
    pub fn inserted_end(&self) -> Position {
        let start = self.range.from;
        match self.text.rsplit_once('\n') {
            None => start.advance(self.text.chars().count() as u32),
            Some((head, tail)) => Position::new(
                start.line + head.matches('\n').count() as u32 + 1,
                tail.chars().count() as u32,
            ),
        }
    }

    /// Returns the span the inserted text occupies after the edit.
    pub fn inserted_span(&self) -> Span {
        Span::new(self.range.from, self.inserted_end())
    }

    /// Maps a pre-edit position to its post-edit counterpart.
    ///
    /// Positions before the edit are unchanged, positions after it shift by
    /// the edit's line/column delta, and positions inside the replaced range
    /// collapse to the end of the inserted text. The mapping is monotonic.
    pub fn map_position(&self, pos: Position) -> Position {
        let Span { from, to } = self.range;
        if pos <= from {
            return pos;
        }
        let new_end = self.inserted_end();
        if pos < to {
            return new_end;
        }
        if pos.line == to.line {
            new_end.advance(pos.column - to.column)
        } else {
            Position::new(pos.line - to.line + new_end.line, pos.column)
        }
    }

    /// Maps both ends of a span through [`TextEdit::map_position`].
    pub fn map_span(&self, span: Span) -> Span {
        Span::new(self.map_position(span.from), self.map_position(span.to))
    }
}
