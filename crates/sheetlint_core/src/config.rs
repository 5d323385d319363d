//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sheetlint_plugin::{
    Checker, CheckerKind, CommandPlugin, ConfigSnapshot, PluginChecker, RuleChecker, RuleOption,
};

use crate::LinterError;

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Config file names looked up by [`LinterConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".sheetlint.jsonc", ".sheetlint.json"];

/// Default time budget of the reconciliation step.
pub const DEFAULT_WATCHDOG_MS: u64 = 500;

/// Default delay before an editor-triggered pass.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Checker used for every pass.
    #[serde(default)]
    pub checker: CheckerKind,

    /// Rule configuration (enable/disable/options).
    #[serde(default)]
    pub rules: BTreeMap<String, RuleOption>,

    /// External programs run by the plugin checker.
    #[serde(default)]
    pub plugins: Vec<PluginCommand>,

    /// Reconciliation time budget, in milliseconds.
    #[serde(default = "default_watchdog_ms")]
    pub watchdog_ms: u64,

    /// Editor debounce delay, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Base directory for resolving relative plugin paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_watchdog_ms() -> u64 {
    DEFAULT_WATCHDOG_MS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// An external plugin program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginCommand {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LinterConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            checker: CheckerKind::default(),
            rules: BTreeMap::new(),
            plugins: Vec::new(),
            watchdog_ms: DEFAULT_WATCHDOG_MS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.sheetlint.jsonc`, `.sheetlint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value =
                    serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
                Validator::new(&schema_json).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| LinterError::internal(format!("Invalid embedded config schema: {}", e)))?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Finds a config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Takes the immutable rule view handed to checkers.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(self.rules.clone())
    }

    /// Reconciliation time budget.
    pub fn watchdog_budget(&self) -> Duration {
        Duration::from_millis(self.watchdog_ms)
    }

    /// Editor debounce delay.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builds the configured checker.
    pub fn build_checker(&self) -> Result<Checker, LinterError> {
        match self.checker {
            CheckerKind::Rules => Ok(Checker::Rules(RuleChecker::builtin())),
            CheckerKind::Plugin => {
                if self.plugins.is_empty() {
                    return Err(LinterError::config(
                        "checker \"plugin\" requires at least one entry in \"plugins\"",
                    ));
                }
                let checker = self
                    .plugins
                    .iter()
                    .fold(PluginChecker::new(), |checker, plugin| {
                        checker.with_plugin(CommandPlugin::new(
                            self.resolve_command(&plugin.command),
                            plugin.args.clone(),
                        ))
                    });
                Ok(Checker::Plugin(checker))
            }
        }
    }

    /// Resolves relative paths against `base_dir`; bare program names are left to `PATH`.
    fn resolve_command(&self, command: &str) -> PathBuf {
        let path = Path::new(command);
        let is_bare = path.components().count() == 1;
        match &self.base_dir {
            Some(base) if path.is_relative() && !is_bare => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Computes a hash of the configuration.
    pub fn hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of the rule settings a lint pass reads.
///
/// Read exactly once per pass, before any region is dispatched.
pub trait ConfigProvider: Send + Sync {
    fn current(&self) -> ConfigSnapshot;
}

impl ConfigProvider for LinterConfig {
    fn current(&self) -> ConfigSnapshot {
        self.snapshot()
    }
}

/// A provider that always returns the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider(ConfigSnapshot);

impl StaticConfigProvider {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self(snapshot)
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn current(&self) -> ConfigSnapshot {
        self.0.clone()
    }
}

/// A provider whose snapshot can be replaced while passes run.
///
/// A pass that already fetched its snapshot keeps it; the next pass sees
/// the replacement.
#[derive(Debug, Clone, Default)]
pub struct SharedConfigProvider {
    inner: Arc<RwLock<ConfigSnapshot>>,
}

impl SharedConfigProvider {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Replaces the snapshot, returning the previous one.
    pub fn replace(&self, snapshot: ConfigSnapshot) -> ConfigSnapshot {
        std::mem::replace(&mut *self.inner.write(), snapshot)
    }
}

impl ConfigProvider for SharedConfigProvider {
    fn current(&self) -> ConfigSnapshot {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_config_new() {
        let config = LinterConfig::new();
        assert_eq!(config.checker, CheckerKind::Rules);
        assert!(config.rules.is_empty());
        assert_eq!(config.watchdog_budget(), Duration::from_millis(500));
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // comments are allowed
            "rules": {
                "block-no-empty": false,
                "length-zero-no-unit": "error",
                "declaration-block-no-duplicate-properties": { "ignore": ["top"] },
            },
            "watchdog_ms": 250
        }"#;

        let config = LinterConfig::from_json(json).unwrap();
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.watchdog_ms, 250);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_config_empty_document() {
        let config = LinterConfig::from_json("").unwrap();
        assert!(config.rules.is_empty());
    }

    #[rstest]
    #[case::unknown_property(r#"{ "ruless": {} }"#)]
    #[case::type_mismatch(r#"{ "watchdog_ms": "fast" }"#)]
    #[case::zero_budget(r#"{ "watchdog_ms": 0 }"#)]
    #[case::invalid_severity(r#"{ "rules": { "rule-id": "loud" } }"#)]
    #[case::unknown_checker(r#"{ "checker": "remote" }"#)]
    #[case::plugin_without_command(r#"{ "plugins": [{ "args": [] }] }"#)]
    fn test_config_validation_errors(#[case] json: &str) {
        let err = LinterConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains("Config validation failed"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_config_invalid_json() {
        let err = LinterConfig::from_json("{ \"rules\": ").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LinterConfig::discover(dir.path()), None);

        fs::write(dir.path().join(".sheetlint.json"), "{}").unwrap();
        assert_eq!(
            LinterConfig::discover(dir.path()),
            Some(dir.path().join(".sheetlint.json"))
        );

        fs::write(dir.path().join(".sheetlint.jsonc"), "{}").unwrap();
        assert_eq!(
            LinterConfig::discover(dir.path()),
            Some(dir.path().join(".sheetlint.jsonc"))
        );
    }

    #[test]
    fn test_from_file_sets_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".sheetlint.json");
        fs::write(&path, r#"{ "checker": "rules" }"#).unwrap();

        let config = LinterConfig::from_file(&path).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_from_file_missing() {
        let err = LinterConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LinterError::Config(_)));
    }

    #[test]
    fn test_build_checker_plugin_requires_plugins() {
        let mut config = LinterConfig::new();
        config.checker = CheckerKind::Plugin;
        assert!(matches!(
            config.build_checker(),
            Err(LinterError::Config(_))
        ));

        config.plugins.push(PluginCommand {
            command: "stylelint-shim".to_string(),
            args: vec![],
        });
        assert_eq!(config.build_checker().unwrap().kind(), CheckerKind::Plugin);
    }

    #[rstest]
    #[case::bare("sh", "sh")]
    #[case::relative("./bin/lint", "/project/./bin/lint")]
    #[case::absolute("/usr/bin/lint", "/usr/bin/lint")]
    fn test_resolve_command(#[case] command: &str, #[case] expected: &str) {
        let mut config = LinterConfig::new();
        config.base_dir = Some(PathBuf::from("/project"));
        assert_eq!(config.resolve_command(command), PathBuf::from(expected));
    }

    #[test]
    fn test_snapshot_and_hash_follow_rules() {
        let mut config = LinterConfig::new();
        let before = (config.snapshot(), config.hash());

        config
            .rules
            .insert("block-no-empty".to_string(), RuleOption::Enabled(false));

        assert_ne!(config.snapshot(), before.0);
        assert_ne!(config.hash(), before.1);
    }

    #[test]
    fn test_shared_provider_replace() {
        let provider = SharedConfigProvider::default();
        let first = provider.current();

        let mut rules = BTreeMap::new();
        rules.insert("block-no-empty".to_string(), RuleOption::Enabled(false));
        let previous = provider.replace(ConfigSnapshot::new(rules));

        assert_eq!(previous, first);
        assert!(!provider.current().is_enabled("block-no-empty", true));
        assert!(first.is_enabled("block-no-empty", true));
    }
}
