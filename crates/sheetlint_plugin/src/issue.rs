//! Raw issues as reported by checkers.

use serde::{Deserialize, Deserializer, Serialize};

/// An issue as a checker reports it, before normalization.
///
/// Positions are relative to the checked text: `line` is 1-based, and
/// `column` is 1-based. Fields that are missing or not numeric
/// deserialize to `None`; such issues are dropped during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIssue {
    /// Line (1-based, relative to the checked text).
    #[serde(default, deserialize_with = "lenient_u32")]
    pub line: Option<u32>,

    /// Column (1-based).
    #[serde(default, alias = "col", deserialize_with = "lenient_u32")]
    pub column: Option<u32>,

    /// Optional explicit end line (1-based).
    #[serde(
        default,
        alias = "endLine",
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_line: Option<u32>,

    /// Optional explicit end column (1-based, exclusive).
    #[serde(
        default,
        alias = "endColumn",
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_column: Option<u32>,

    /// The issue message.
    #[serde(default, alias = "text")]
    pub message: String,

    /// Severity label as the checker spells it.
    #[serde(default, alias = "type")]
    pub severity: String,

    /// The rule that produced the issue.
    #[serde(
        default,
        deserialize_with = "rule_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub rule: Option<String>,
}

impl RawIssue {
    /// Creates an issue at a 1-based line/column.
    pub fn new(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Sets the explicit end (1-based line, 1-based exclusive column).
    pub fn with_end(mut self, line: u32, column: u32) -> Self {
        self.end_line = Some(line);
        self.end_column = Some(column);
        self
    }

    /// Sets the severity label.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    /// Sets the rule name.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

/// Accepts integers and numeric strings; everything else becomes `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts `"rule-id"` or `{ "id": "rule-id" }`.
fn rule_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Object(map)) => {
            map.get("id").and_then(|id| id.as_str()).map(str::to_string)
        }
        _ => None,
    })
}
