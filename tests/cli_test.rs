mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{clean_project, write};
use std::fs;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn clean_project_exits_zero() {
    let dir = clean_project();
    let output = cargo_bin_cmd!("structlint")
        .arg("--plain")
        .current_dir(dir.path())
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(output.status.success(), "{stdout}");
    for title in [" METHOD ORDER ", " DOCUMENTATION ", " TESTS ", " INTERNAL MODULE IMPORTS "] {
        assert!(stdout.contains(title), "missing {title:?} in\n{stdout}");
    }
    assert!(stdout.contains("No problems detected."));
}

#[test]
fn problems_exit_with_status_one() {
    let dir = clean_project();
    fs::remove_file(dir.path().join("tests/unit/util_test.py")).unwrap();

    let output = cargo_bin_cmd!("structlint")
        .args(["tests", "--plain", "--root"])
        .arg(dir.path())
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains(" MISSING "));
    assert!(stdout.contains("tests/unit/util_test.py:test_helper"));
}

#[test]
fn json_format_is_machine_readable() {
    let dir = clean_project();
    let output = cargo_bin_cmd!("structlint")
        .args(["methods", "--format", "json"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["problems"], false);
    assert_eq!(value["reports"][0]["check"], "method_order");
}

#[test]
fn init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("structlint")
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("structlint.toml").is_file());

    cargo_bin_cmd!("structlint")
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn config_prints_resolved_values() {
    let dir = clean_project();
    write(dir.path(), "structlint.toml", "[docs]\nmd_dir = \"docs/api\"\n");

    let output = cargo_bin_cmd!("structlint")
        .arg("config")
        .current_dir(dir.path())
        .output()
        .unwrap();

    let stdout = stdout_of(&output);
    assert!(output.status.success(), "{stdout}");
    assert!(stdout.contains("module_name = \"pkg\""));
    assert!(stdout.contains("md_dir = \"docs/api\""));
}

#[test]
fn invalid_configuration_is_a_fatal_error() {
    let dir = clean_project();
    write(dir.path(), "structlint.toml", "[tests]\nignore = \"[\"\n");

    let output = cargo_bin_cmd!("structlint")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("tests.ignore"));
}
