use serde::Serialize;
use sheetlint_plugin::Diagnostic;
use sheetlint_text::{Span, TextEdit};

/// Per-document lint state carried between passes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentLintState {
    /// Current diagnostics, sorted by start position.
    pub diagnostics: Vec<Diagnostic>,
    /// Regions linted successfully by the most recent pass.
    pub last_regions: Vec<Span>,
    /// Whether a pass has covered the whole document yet.
    pub has_run: bool,
}

impl DocumentLintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves stored positions through an edit.
    ///
    /// The mapping is monotonic, so the diagnostics stay sorted.
    pub fn map_through(&mut self, edit: &TextEdit) {
        for diag in &mut self.diagnostics {
            diag.span = edit.map_span(diag.span);
        }
        for span in &mut self.last_regions {
            *span = edit.map_span(*span);
        }
    }

    /// Forgets everything, so the next pass relints the whole document.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
