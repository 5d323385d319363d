//! The asynchronous, plugin-based checker.
//!
//! Plugins implement [`LintPlugin`] and report results in the shape
//! stylelint-compatible tools use: a list of result entries, each holding a
//! `warnings` list. Only the first entry of each plugin's output is read.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, join_all};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{ConfigSnapshot, PluginError, RawIssue};

/// Environment variable carrying the rule map (JSON) to command plugins.
pub const CONFIG_ENV: &str = "SHEETLINT_CONFIG";

/// One result entry of a plugin run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginResult {
    /// Issues found.
    #[serde(default)]
    pub warnings: Vec<RawIssue>,
}

/// Accepted top-level shapes of plugin output.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PluginOutput {
    List(Vec<PluginResult>),
    Wrapped { results: Vec<PluginResult> },
    Single(PluginResult),
}

impl PluginOutput {
    fn into_results(self) -> Vec<PluginResult> {
        match self {
            PluginOutput::List(results) | PluginOutput::Wrapped { results } => results,
            PluginOutput::Single(result) => vec![result],
        }
    }
}

/// Parses plugin stdout into result entries.
pub fn parse_plugin_output(raw: &str) -> Result<Vec<PluginResult>, PluginError> {
    let output: PluginOutput = serde_json::from_str(raw.trim())
        .map_err(|e| PluginError::invalid_output(format!("{}", e)))?;
    Ok(output.into_results())
}

/// An asynchronous lint plugin.
#[async_trait]
pub trait LintPlugin: Send + Sync {
    /// Plugin name, for logs and errors.
    fn name(&self) -> &str;

    /// Lints `code` with the given rule settings.
    async fn lint(
        &self,
        code: &str,
        config: &ConfigSnapshot,
    ) -> Result<Vec<PluginResult>, PluginError>;
}

/// Runs an external program as a plugin.
///
/// The code is written to the program's stdin, the rule map is passed as
/// JSON in [`CONFIG_ENV`], and stdout is parsed with
/// [`parse_plugin_output`]. A non-zero exit status is accepted as long as
/// stdout is not empty, since linters commonly exit non-zero on findings.
#[derive(Debug, Clone)]
pub struct CommandPlugin {
    name: String,
    program: PathBuf,
    args: Vec<String>,
}

impl CommandPlugin {
    /// Creates a plugin running `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        let program = program.into();
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            name,
            program,
            args,
        }
    }
}

#[async_trait]
impl LintPlugin for CommandPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lint(
        &self,
        code: &str,
        config: &ConfigSnapshot,
    ) -> Result<Vec<PluginResult>, PluginError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(CONFIG_ENV, config.to_json().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PluginError::call(format!("{}: stdin unavailable", self.name)))?;
        let write = async move {
            stdin.write_all(code.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if let Err(e) = written
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(e.into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(PluginError::call(format!(
                "{} exited with {}: {}",
                self.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_plugin_output(&stdout)
    }
}

/// Runs every registered plugin concurrently over the same code.
#[derive(Clone, Default)]
pub struct PluginChecker {
    plugins: Vec<Arc<dyn LintPlugin>>,
}

impl PluginChecker {
    /// Creates a checker with no plugins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin.
    pub fn with_plugin(mut self, plugin: impl LintPlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Adds a shared plugin.
    pub fn with_shared(mut self, plugin: Arc<dyn LintPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Starts linting `code`.
    ///
    /// The returned future owns its inputs. It fails if any plugin fails;
    /// otherwise issues of all plugins are concatenated in plugin order.
    pub fn lint(
        &self,
        code: String,
        config: ConfigSnapshot,
    ) -> BoxFuture<'static, Result<Vec<RawIssue>, PluginError>> {
        let plugins = self.plugins.clone();
        async move {
            let outcomes = join_all(plugins.iter().map(|p| p.lint(&code, &config))).await;

            let mut issues = Vec::new();
            for (plugin, outcome) in plugins.iter().zip(outcomes) {
                let results = outcome.inspect_err(|e| {
                    warn!(plugin = plugin.name(), "Plugin failed: {}", e);
                })?;
                let warnings = results
                    .into_iter()
                    .next()
                    .map(|r| r.warnings)
                    .unwrap_or_default();
                debug!(plugin = plugin.name(), count = warnings.len(), "Plugin finished");
                issues.extend(warnings.into_iter().map(cook_issue));
            }
            Ok(issues)
        }
        .boxed()
    }
}

impl std::fmt::Debug for PluginChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginChecker")
            .field("plugins", &names)
            .finish()
    }
}

/// Strips a leading "Unexpected " and capitalizes the message.
///
/// Only the prefix is stripped; "Unexpected " later in the message is kept.
fn cook_issue(mut issue: RawIssue) -> RawIssue {
    let message = issue
        .message
        .strip_prefix("Unexpected ")
        .unwrap_or(&issue.message);
    let mut chars = message.chars();
    issue.message = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    issue
}
