//! # Msctl CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Top-level behavior of the `msctl` binary: `--help`, `--version`, and how
//! it reports a missing project configuration.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_lists_subcommands() {
    msctl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("enable"))
        .stdout(predicate::str::contains("disable"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_version_flag() {
    msctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_enable_without_modules_is_a_usage_error() {
    msctl_cmd().arg("enable").assert().failure();
}

#[test]
fn test_missing_project_config_fails() {
    let dir = tempdir().unwrap();
    msctl_cmd()
        .env("MSCTL_PROJECT_DIR", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No msctl.toml found"));
}
