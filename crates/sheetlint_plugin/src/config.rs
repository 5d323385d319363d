//! Rule settings handed to checkers.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Severity;

/// Configuration for a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled (boolean).
    Enabled(bool),
    /// Rule is enabled with severity string ("error", "warning", "info", "off").
    Severity(String),
    /// Rule is enabled with specific options object.
    Options(serde_json::Value),
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
            RuleOption::Options(_) => true,
        }
    }

    /// Gets the rule options as JSON value.
    pub fn options(&self) -> serde_json::Value {
        match self {
            RuleOption::Enabled(_) => serde_json::Value::Null,
            RuleOption::Severity(_) => serde_json::Value::Null,
            RuleOption::Options(v) => v.clone(),
        }
    }

    /// Returns the severity override, if the setting carries one.
    ///
    /// Options objects may carry it under a `"severity"` key.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleOption::Enabled(_) => None,
            RuleOption::Severity(s) => Severity::parse(s),
            RuleOption::Options(v) => v.get("severity")?.as_str().and_then(Severity::parse),
        }
    }
}

/// An immutable view of the rule settings, fetched once per lint pass.
///
/// Cloning is cheap; every region of a pass sees the same snapshot.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    rules: Arc<BTreeMap<String, RuleOption>>,
    fingerprint: Arc<str>,
}

impl ConfigSnapshot {
    /// Creates a snapshot from a rule map.
    pub fn new(rules: BTreeMap<String, RuleOption>) -> Self {
        let json = serde_json::to_string(&rules).unwrap_or_default();
        let fingerprint = blake3::hash(json.as_bytes()).to_hex().to_string();
        Self {
            rules: Arc::new(rules),
            fingerprint: fingerprint.into(),
        }
    }

    /// Returns the rule map.
    pub fn rules(&self) -> &BTreeMap<String, RuleOption> {
        &self.rules
    }

    /// Returns the setting for a rule, if configured.
    pub fn get(&self, rule: &str) -> Option<&RuleOption> {
        self.rules.get(rule)
    }

    /// Returns whether a rule runs, falling back to `default` when unconfigured.
    pub fn is_enabled(&self, rule: &str, default: bool) -> bool {
        self.get(rule).map_or(default, RuleOption::is_enabled)
    }

    /// BLAKE3 hex digest of the rule map, for logs.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Serializes the rule map as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&*self.rules).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl PartialEq for ConfigSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}
