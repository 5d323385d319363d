use serde::Serialize;
use sheetlint_text::{Span, TextBuffer};

/// A span of the document recomputed in one pass, with its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub span: Span,
    pub text: String,
}

impl Region {
    /// Snapshots the text under `span`.
    pub fn capture<B: TextBuffer + ?Sized>(buffer: &B, span: Span) -> Self {
        Self {
            span,
            text: buffer.slice(span),
        }
    }
}
