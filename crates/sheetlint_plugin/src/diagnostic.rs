//! Diagnostic types for lint results.

use std::fmt;

use serde::{Deserialize, Serialize};
use sheetlint_text::{Position, Span};

/// Severity level for diagnostics.
///
/// A closed set understood by every renderer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    Error,
    /// Warning - should be reviewed.
    #[default]
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    /// Parses a severity label, case-insensitively.
    ///
    /// Accepts the aliases checkers commonly emit (`"warn"`,
    /// `"information"`). Returns `None` for anything else, including `"off"`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" | "warn" => Some(Self::Warning),
            "info" | "information" => Some(Self::Info),
            _ => None,
        }
    }

    /// Returns the lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned lint result, anchored to absolute document coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Span in the document.
    pub span: Span,

    /// The diagnostic message.
    pub message: String,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// The rule that generated this diagnostic, when the checker reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic with warning severity.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            severity: Severity::Warning,
            rule_id: None,
        }
    }

    /// Creates a diagnostic covering the single character at `at`.
    pub fn at(at: Position, message: impl Into<String>) -> Self {
        Self::new(Span::new(at, at.advance(1)), message)
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the originating rule.
    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Start position.
    #[inline]
    pub fn from(&self) -> Position {
        self.span.from
    }

    /// End position.
    #[inline]
    pub fn to(&self) -> Position {
        self.span.to
    }
}
