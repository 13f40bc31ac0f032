//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd. These exercise
//! only the surfaces that need neither a browser nor a live server.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the sitecheck binary
fn sitecheck_cmd() -> Command {
    Command::cargo_bin("sitecheck").unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    sitecheck_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_quiet_flag_describes_log_scope() {
    // --quiet silences the log stream only; progress lines and the
    // summary block are deliverable output and keep printing
    sitecheck_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Suppress log output"));
}

#[test]
fn test_version_command() {
    sitecheck_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitecheck"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_short_version_flag() {
    sitecheck_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitecheck"));
}

// ─────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_default() {
    sitecheck_cmd()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("[target]"))
        .stdout(predicate::str::contains("[colors]"))
        .stdout(predicate::str::contains("[performance]"))
        .stdout(predicate::str::contains("[report]"))
        .stdout(predicate::str::contains("[logging]"));
}

#[test]
fn test_config_validate_default() {
    // Default config should always be valid
    sitecheck_cmd()
        .arg("config")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_init_and_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitecheck.toml");

    sitecheck_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    assert!(path.exists());

    sitecheck_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sitecheck.toml");
    std::fs::write(&path, "# existing\n").unwrap();

    sitecheck_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // --force overwrites
    sitecheck_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(path.to_str().unwrap())
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_config_validate_rejects_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[target\nbase_url = ").unwrap();

    sitecheck_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("E10"));
}

// ─────────────────────────────────────────────────────────────────
// Run Command Error Paths
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_run_with_missing_config_file() {
    sitecheck_cmd()
        .arg("run")
        .arg("--config")
        .arg("/nonexistent/sitecheck.toml")
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_run_rejects_invalid_url_override() {
    sitecheck_cmd()
        .arg("run")
        .arg("--url")
        .arg("not a url")
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Configuration error"));
}
