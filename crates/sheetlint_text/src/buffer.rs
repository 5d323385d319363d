//! Text buffer abstraction and a line-indexed implementation.

use std::borrow::Cow;

use crate::{Position, Span, TextEdit};

/// Read access to a document, as required by the lint engine.
///
/// Implemented by editor integrations. Lines are separated by `\n`; a
/// `\r` preceding it is treated as ordinary line content.
pub trait TextBuffer {
    /// Returns the full current text.
    fn text(&self) -> Cow<'_, str>;

    /// Returns the text in `[span.from, span.to)`.
    ///
    /// Positions past the end of a line or the document are clamped.
    fn slice(&self, span: Span) -> String;

    /// Returns the position after the last character: `{lastLine, lastLineLength}`.
    fn end(&self) -> Position;

    /// Finds the first occurrence of `token` starting at or after `from`.
    fn find_next(&self, token: &str, from: Position) -> Option<Span>;

    /// Finds the last occurrence of `token` ending at or before `before`.
    fn find_prev(&self, token: &str, before: Position) -> Option<Span>;
}

/// A `String` buffer with a precomputed line index.
///
/// Search only matches tokens that do not span lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    /// Byte offset of each line start.
    line_starts: Vec<usize>,
}

impl LineBuffer {
    /// Creates a buffer from text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = index_lines(&text);
        Self { text, line_starts }
    }

    /// Returns the number of lines (always at least one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the content of line `idx`, without its terminating newline.
    pub fn line(&self, idx: usize) -> Option<&str> {
        let start = *self.line_starts.get(idx)?;
        let end = match self.line_starts.get(idx + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        Some(&self.text[start..end])
    }

    /// Converts a position to a byte offset, clamping out-of-range values.
    pub fn offset_of(&self, pos: Position) -> usize {
        let idx = pos.line as usize;
        match self.line(idx) {
            Some(line) => self.line_starts[idx] + byte_index(line, pos.column),
            None => self.text.len(),
        }
    }

    /// Converts a byte offset to a position. Offsets past the end map to [`TextBuffer::end`].
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let idx = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[idx];
        let column = self.text[start..offset].chars().count();
        Position::new(idx as u32, column as u32)
    }

    /// Applies an edit whose range is expressed in the current coordinates.
    pub fn apply(&mut self, edit: &TextEdit) {
        let start = self.offset_of(edit.range.from);
        let end = self.offset_of(edit.range.to).max(start);
        self.text.replace_range(start..end, &edit.text);
        self.line_starts = index_lines(&self.text);
    }

    /// Replaces the whole content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.line_starts = index_lines(&self.text);
    }

    /// Returns the content as `&str`.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl TextBuffer for LineBuffer {
    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn slice(&self, span: Span) -> String {
        let span = span.normalized();
        let start = self.offset_of(span.from);
        let end = self.offset_of(span.to).max(start);
        self.text[start..end].to_string()
    }

    fn end(&self) -> Position {
        let last = self.line_count() - 1;
        let column = self.line(last).map_or(0, |l| l.chars().count());
        Position::new(last as u32, column as u32)
    }

    fn find_next(&self, token: &str, from: Position) -> Option<Span> {
        if token.is_empty() {
            return None;
        }
        let first = from.line as usize;
        for idx in first..self.line_count() {
            let line = self.line(idx)?;
            let skip = if idx == first {
                byte_index(line, from.column)
            } else {
                0
            };
            if let Some(found) = line[skip..].find(token) {
                return Some(line_match(idx, line, skip + found, token));
            }
        }
        None
    }

    fn find_prev(&self, token: &str, before: Position) -> Option<Span> {
        if token.is_empty() {
            return None;
        }
        let last = (before.line as usize).min(self.line_count() - 1);
        for idx in (0..=last).rev() {
            let line = self.line(idx)?;
            let limit = if idx == before.line as usize {
                byte_index(line, before.column)
            } else {
                line.len()
            };
            if let Some(found) = line[..limit].rfind(token) {
                return Some(line_match(idx, line, found, token));
            }
        }
        None
    }
}

impl From<&str> for LineBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn index_lines(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Byte index of char column `column` in `line`, clamped to the line length.
fn byte_index(line: &str, column: u32) -> usize {
    line.char_indices()
        .nth(column as usize)
        .map_or(line.len(), |(i, _)| i)
}

fn line_match(idx: usize, line: &str, byte: usize, token: &str) -> Span {
    let column = line[..byte].chars().count() as u32;
    let from = Position::new(idx as u32, column);
    Span::new(from, from.advance(token.chars().count() as u32))
}
