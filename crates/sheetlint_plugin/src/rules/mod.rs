//! The synchronous, rule-based checker.
//!
//! Each [`Rule`] inspects a scanned [`Stylesheet`] and reports findings.
//! [`RuleChecker`] runs the rules enabled by the config snapshot and turns
//! findings into [`RawIssue`]s, appending the rule id to every message.

mod builtin;
pub mod scanner;

use tracing::debug;

use crate::{ConfigSnapshot, RawIssue, Severity};

pub use builtin::{
    BlockNoEmpty, ColorNoInvalidHex, DeclarationBlockNoDuplicateProperties,
    DeclarationNoImportant, LengthZeroNoUnit,
};
pub use scanner::{Block, Declaration, SourceLoc, Stylesheet};

/// A single finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub loc: SourceLoc,
    pub message: String,
}

impl Finding {
    pub fn new(loc: SourceLoc, message: impl Into<String>) -> Self {
        Self {
            loc,
            message: message.into(),
        }
    }
}

/// A stylesheet rule.
pub trait Rule: Send + Sync {
    /// Stable rule identifier, used as config key.
    fn id(&self) -> &'static str;

    /// Severity used when the config does not override it.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether the rule runs when the config does not mention it.
    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Inspects `sheet` and appends findings.
    fn check(&self, sheet: &Stylesheet, options: &serde_json::Value, findings: &mut Vec<Finding>);
}

/// Runs a fixed set of rules over source text.
pub struct RuleChecker {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChecker {
    /// Creates a checker with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a checker with every built-in rule.
    pub fn builtin() -> Self {
        Self::new()
            .with_rule(BlockNoEmpty)
            .with_rule(DeclarationNoImportant)
            .with_rule(DeclarationBlockNoDuplicateProperties)
            .with_rule(LengthZeroNoUnit)
            .with_rule(ColorNoInvalidHex)
    }

    /// Adds a rule.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Returns the ids of the registered rules.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Lints `source` with the rules enabled in `config`.
    ///
    /// Issues come back sorted by position.
    pub fn lint(&self, source: &str, config: &ConfigSnapshot) -> Vec<RawIssue> {
        let sheet = Stylesheet::scan(source);
        let mut issues = Vec::new();
        let mut findings = Vec::new();

        for rule in &self.rules {
            let id = rule.id();
            if !config.is_enabled(id, rule.enabled_by_default()) {
                continue;
            }
            let setting = config.get(id);
            let options = setting.map(|s| s.options()).unwrap_or_default();
            let severity = setting
                .and_then(|s| s.severity())
                .unwrap_or_else(|| rule.default_severity());

            rule.check(&sheet, &options, &mut findings);
            debug!(rule = id, count = findings.len(), "Rule finished");

            issues.extend(findings.drain(..).map(|f| {
                RawIssue::new(f.loc.line, f.loc.column, format!("{} ({})", f.message, id))
                    .with_severity(severity.as_str())
                    .with_rule(id)
            }));
        }

        issues.sort_by_key(|i| (i.line, i.column));
        issues
    }
}

impl Default for RuleChecker {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for RuleChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChecker")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleOption;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn snapshot(entries: &[(&str, RuleOption)]) -> ConfigSnapshot {
        let rules: BTreeMap<_, _> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        ConfigSnapshot::new(rules)
    }

    #[test]
    fn test_builtin_rule_ids() {
        assert_eq!(
            RuleChecker::builtin().rule_ids(),
            vec![
                "block-no-empty",
                "declaration-no-important",
                "declaration-block-no-duplicate-properties",
                "length-zero-no-unit",
                "color-no-invalid-hex",
            ]
        );
    }

    #[test]
    fn test_lint_appends_rule_id_and_sorts() {
        let checker = RuleChecker::builtin();
        let issues = checker.lint(
            "a { margin: 0px; }\nb { }",
            &ConfigSnapshot::default(),
        );

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, Some(1));
        assert_eq!(issues[0].rule.as_deref(), Some("length-zero-no-unit"));
        assert!(issues[0].message.ends_with("(length-zero-no-unit)"));
        assert_eq!(issues[1].line, Some(2));
        assert_eq!(issues[1].rule.as_deref(), Some("block-no-empty"));
    }

    #[test]
    fn test_lint_respects_disabled_rules_and_severity_override() {
        let checker = RuleChecker::builtin();
        let config = snapshot(&[
            ("block-no-empty", RuleOption::Enabled(false)),
            ("length-zero-no-unit", RuleOption::Severity("error".into())),
        ]);

        let issues = checker.lint("a { margin: 0px; }\nb { }", &config);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, "error");
    }

    #[test]
    fn test_lint_empty_source() {
        assert!(
            RuleChecker::builtin()
                .lint("", &ConfigSnapshot::default())
                .is_empty()
        );
    }
}
