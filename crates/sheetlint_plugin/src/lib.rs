//! # sheetlint_plugin
//!
//! Checker contract for sheetlint.
//!
//! This crate provides:
//! - `RawIssue`, the position-relative issue every checker reports
//! - `Diagnostic` and `Severity`, the normalized result types
//! - `ConfigSnapshot`, the rule settings handed to checkers
//! - `RuleChecker`, a synchronous checker over built-in stylesheet rules
//! - `PluginChecker`, an asynchronous checker over `LintPlugin`s
//! - `Checker`, the closed set of variants the engine dispatches to
//!
//! ## Example
//!
//! ```rust
//! use sheetlint_plugin::{Checker, ConfigSnapshot};
//!
//! # async fn run() -> Result<(), sheetlint_plugin::PluginError> {
//! let checker = Checker::default();
//! let issues = checker.lint("a { }", &ConfigSnapshot::default())?.resolve().await?;
//!
//! assert_eq!(issues[0].line, Some(1));
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod diagnostic;
mod error;
mod issue;
mod plugin;
pub mod rules;

pub use checker::{Checker, CheckerKind, CheckerOutput};
pub use config::{ConfigSnapshot, RuleOption};
pub use diagnostic::{Diagnostic, Severity};
pub use error::PluginError;
pub use issue::RawIssue;
pub use plugin::{CONFIG_ENV, CommandPlugin, LintPlugin, PluginChecker, PluginResult, parse_plugin_output};
pub use rules::{Rule, RuleChecker};

pub use async_trait::async_trait;
