//! End-to-end tests of the shlint binary against fixture stylesheets.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn shlint_cmd() -> Command {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("Failed to find workspace root");
    let mut cmd = Command::new(workspace_root.join("target/debug/shlint"));
    cmd.current_dir(fixtures_dir());
    cmd
}

mod valid_cases {
    use super::*;

    #[test]
    fn clean_stylesheet_has_no_issues() {
        shlint_cmd()
            .args(["lint", "clean.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn warnings_do_not_fail_the_run() {
        shlint_cmd()
            .args(["lint", "warnings.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2:14 warning Use of !important"))
            .stdout(predicate::str::contains("3:3 warning Duplicate property \"color\""))
            .stdout(predicate::str::contains("7:8 warning Empty block"))
            .stdout(predicate::str::contains("found 3 issues"));
    }
}

mod invalid_cases {
    use super::*;

    #[test]
    fn errors_fail_the_run() {
        shlint_cmd()
            .args(["lint", "errors.css"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("3:10 error Invalid hex color \"#ggg\""))
            .stdout(predicate::str::contains("4:11 info Unit on zero length \"0px\""));
    }

    #[test]
    fn json_output_snapshot() {
        let output = shlint_cmd()
            .args(["lint", "--format", "json", "errors.css"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        insta::with_settings!({ sort_maps => true }, {
            insta::assert_json_snapshot!("lint_errors_json", value);
        });
    }
}

mod directories {
    use super::*;

    #[test]
    fn lints_every_fixture() {
        shlint_cmd()
            .args(["lint", "."])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Checked 3 files, found 6 issues"));
    }
}
