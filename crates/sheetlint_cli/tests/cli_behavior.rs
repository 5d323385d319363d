//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a command for the shlint CLI
fn shlint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_shlint"))
}

/// A scratch directory with the given files.
fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        shlint_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        shlint_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn clean_file_exits_zero() {
        let dir = workspace(&[("clean.css", ".a {\n  color: red;\n}\n")]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "clean.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files, found 0 issues"));
    }

    #[test]
    fn warnings_alone_exit_zero() {
        let dir = workspace(&[("empty.css", ".a { }\n")]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "empty.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1:4 warning Empty block (block-no-empty)"));
    }

    #[test]
    fn error_diagnostics_exit_one() {
        let dir = workspace(&[("bad.css", ".a {\n  color: #12;\n}\n")]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "bad.css"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("2:10 error"));
    }

    #[test]
    fn walks_directories() {
        let dir = workspace(&[
            ("a.css", ".a { }\n"),
            ("b.scss", ".b { top: 0px; }\n"),
            ("readme.md", "# not a stylesheet { }\n"),
        ]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "."])
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 2 files, found 2 issues"));
    }

    #[test]
    fn missing_path_exits_two() {
        let dir = workspace(&[]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "nonexistent.css"])
            .assert()
            .code(2);
    }

    #[test]
    fn json_output_is_parseable() {
        let dir = workspace(&[("empty.css", ".a { }\n")]);

        let output = shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "--format", "json", "empty.css"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value[0]["path"], "empty.css");
        assert_eq!(value[0]["diagnostics"][0]["rule_id"], "block-no-empty");
        assert_eq!(value[0]["diagnostics"][0]["severity"], "warning");
    }

    #[test]
    fn discovered_config_disables_rules() {
        let dir = workspace(&[
            (".sheetlint.json", r#"{ "rules": { "block-no-empty": false } }"#),
            ("empty.css", ".a { }\n"),
        ]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "empty.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn config_can_raise_severity() {
        let dir = workspace(&[
            ("strict.jsonc", "// strict\n{ \"rules\": { \"block-no-empty\": \"error\" } }"),
            ("empty.css", ".a { }\n"),
        ]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["--config", "strict.jsonc", "lint", "empty.css"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("error Empty block"));
    }

    #[test]
    fn failing_plugin_marks_file_failed() {
        let dir = workspace(&[
            (
                ".sheetlint.json",
                r#"{ "checker": "plugin", "plugins": [{ "command": "sh", "args": ["-c", "exit 3"] }] }"#,
            ),
            ("a.css", ".a { }\n"),
        ]);

        shlint_cmd()
            .current_dir(dir.path())
            .args(["lint", "a.css"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("failed to lint"));
    }
}

mod check_config_command {
    use super::*;

    #[test]
    fn reports_defaults_without_config() {
        let dir = workspace(&[]);

        shlint_cmd()
            .current_dir(dir.path())
            .arg("check-config")
            .assert()
            .success()
            .stdout(predicate::str::contains("defaults apply"));
    }

    #[test]
    fn accepts_valid_config() {
        let dir = workspace(&[(".sheetlint.json", r#"{ "watchdog_ms": 250 }"#)]);

        shlint_cmd()
            .current_dir(dir.path())
            .arg("check-config")
            .assert()
            .success()
            .stdout(predicate::str::contains("ok"))
            .stdout(predicate::str::contains("watchdog: 250ms"));
    }

    #[test]
    fn rejects_schema_violation() {
        let dir = workspace(&[(".sheetlint.json", r#"{ "watchdog_ms": 0 }"#)]);

        shlint_cmd()
            .current_dir(dir.path())
            .arg("check-config")
            .assert()
            .code(2);
    }

    #[test]
    fn rejects_plugin_checker_without_plugins() {
        let dir = workspace(&[(".sheetlint.json", r#"{ "checker": "plugin" }"#)]);

        shlint_cmd()
            .current_dir(dir.path())
            .arg("check-config")
            .assert()
            .code(2);
    }
}
