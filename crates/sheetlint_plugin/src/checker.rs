//! The closed set of checkers the engine can dispatch to.

use std::fmt;
use std::str::FromStr;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::{ConfigSnapshot, PluginChecker, PluginError, RawIssue, RuleChecker};

/// Names a checker variant in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckerKind {
    /// Built-in synchronous rules.
    #[default]
    Rules,
    /// Asynchronous plugins.
    Plugin,
}

impl FromStr for CheckerKind {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rules" => Ok(Self::Rules),
            "plugin" => Ok(Self::Plugin),
            other => Err(PluginError::not_found(other)),
        }
    }
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => f.write_str("rules"),
            Self::Plugin => f.write_str("plugin"),
        }
    }
}

/// What a checker invocation produced.
pub enum CheckerOutput {
    /// Issues computed synchronously.
    Ready(Vec<RawIssue>),
    /// A computation that resolves to issues later.
    Pending(BoxFuture<'static, Result<Vec<RawIssue>, PluginError>>),
}

impl CheckerOutput {
    /// Waits for the issues.
    pub async fn resolve(self) -> Result<Vec<RawIssue>, PluginError> {
        match self {
            CheckerOutput::Ready(issues) => Ok(issues),
            CheckerOutput::Pending(pending) => pending.await,
        }
    }

    /// Returns true if the issues are already available.
    pub fn is_ready(&self) -> bool {
        matches!(self, CheckerOutput::Ready(_))
    }
}

impl fmt::Debug for CheckerOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerOutput::Ready(issues) => f.debug_tuple("Ready").field(&issues.len()).finish(),
            CheckerOutput::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A checker: one of the supported variants behind a single `lint` call.
#[derive(Debug)]
pub enum Checker {
    /// Synchronous rule-based checker.
    Rules(RuleChecker),
    /// Asynchronous plugin-based checker.
    Plugin(PluginChecker),
}

impl Checker {
    /// Returns the variant name.
    pub fn kind(&self) -> CheckerKind {
        match self {
            Checker::Rules(_) => CheckerKind::Rules,
            Checker::Plugin(_) => CheckerKind::Plugin,
        }
    }

    /// Invokes the checker on `text`.
    ///
    /// Fails immediately when the checker cannot start (for example a plugin
    /// checker without plugins); failures while running surface from
    /// [`CheckerOutput::resolve`].
    pub fn lint(&self, text: &str, config: &ConfigSnapshot) -> Result<CheckerOutput, PluginError> {
        match self {
            Checker::Rules(rules) => Ok(CheckerOutput::Ready(rules.lint(text, config))),
            Checker::Plugin(plugins) => {
                if plugins.is_empty() {
                    return Err(PluginError::not_found("no plugins configured"));
                }
                Ok(CheckerOutput::Pending(
                    plugins.lint(text.to_string(), config.clone()),
                ))
            }
        }
    }
}

impl Default for Checker {
    fn default() -> Self {
        Checker::Rules(RuleChecker::builtin())
    }
}

impl From<RuleChecker> for Checker {
    fn from(rules: RuleChecker) -> Self {
        Checker::Rules(rules)
    }
}

impl From<PluginChecker> for Checker {
    fn from(plugins: PluginChecker) -> Self {
        Checker::Plugin(plugins)
    }
}
