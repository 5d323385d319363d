//! LSP type conversion utilities.
//!
//! LSP positions count UTF-16 code units; the engine counts chars.

use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, NumberOrString, Position as LspPosition, Range,
    TextDocumentContentChangeEvent,
};

use sheetlint_core::{Diagnostic as SheetDiagnostic, Severity};
use sheetlint_text::{LineBuffer, Position, Span, TextBuffer, TextEdit};

/// Converts an engine diagnostic to an LSP diagnostic.
pub fn to_lsp_diagnostic(diag: &SheetDiagnostic, buffer: &LineBuffer) -> Diagnostic {
    let severity = match diag.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    Diagnostic {
        range: span_to_range(diag.span, buffer),
        severity: Some(severity),
        code: diag.rule_id.clone().map(NumberOrString::String),
        source: Some("sheetlint".to_string()),
        message: diag.message.clone(),
        ..Default::default()
    }
}

/// Converts a span to an LSP range.
pub fn span_to_range(span: Span, buffer: &LineBuffer) -> Range {
    Range::new(
        to_lsp_position(span.from, buffer),
        to_lsp_position(span.to, buffer),
    )
}

/// Converts a char position to an LSP position.
///
/// Columns past the end of the line keep counting one unit per char.
pub fn to_lsp_position(pos: Position, buffer: &LineBuffer) -> LspPosition {
    let Some(line) = buffer.line(pos.line as usize) else {
        return LspPosition::new(pos.line, pos.column);
    };
    let mut units = 0u32;
    let mut chars = line.chars();
    for _ in 0..pos.column {
        units += chars.next().map_or(1, |ch| ch.len_utf16() as u32);
    }
    LspPosition::new(pos.line, units)
}

/// Converts an LSP position to a char position, clamped to the document.
pub fn from_lsp_position(pos: LspPosition, buffer: &LineBuffer) -> Position {
    let Some(line) = buffer.line(pos.line as usize) else {
        return buffer.end();
    };
    let mut units = 0u32;
    let mut column = 0u32;
    for ch in line.chars() {
        if units >= pos.character {
            break;
        }
        units += ch.len_utf16() as u32;
        column += 1;
    }
    Position::new(pos.line, column)
}

/// Converts a content change to an edit of `buffer`.
///
/// A change without a range replaces the whole document.
pub fn to_text_edit(change: &TextDocumentContentChangeEvent, buffer: &LineBuffer) -> TextEdit {
    let range = match change.range {
        Some(range) => Span::new(
            from_lsp_position(range.start, buffer),
            from_lsp_position(range.end, buffer),
        ),
        None => Span::new(Position::default(), buffer.end()),
    };
    TextEdit::new(range, change.text.clone())
}
