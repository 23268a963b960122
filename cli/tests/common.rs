//! # Msctl CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and gets a command builder for the compiled
//! `msctl` binary plus a throwaway project fixture on disk.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

/// `msctl.toml` registering auth, mailer, a malformed module and one
/// without a settings file.
pub const PROJECT_CONFIG: &str = r#"
[[modules]]
name = "auth"
key = "auth"
settings_file = "settings.json"

[[modules]]
name = "mailer"
key = "mailer"
settings_file = "settings.json"

[[modules]]
name = "broken"
key = "broken"
settings_file = "settings.json"

[[modules]]
name = "health"
key = "health"
"#;

/// A project in a temporary directory, removed on drop.
pub struct TestProject {
    dir: TempDir,
    config_home: TempDir,
}

impl TestProject {
    /// Framework declares `ENVIRONMENT`, auth `JWT_SECRET`, mailer
    /// `SMTP_HOST` and `SMTP_PORT`; broken is not valid JSON.
    pub fn new() -> Self {
        let project = Self {
            dir: tempdir().expect("Failed to create project dir"),
            config_home: tempdir().expect("Failed to create config home"),
        };
        project.write("msctl.toml", PROJECT_CONFIG);
        project.write("settings.json", r#"{"env": {"ENVIRONMENT": "development"}}"#);
        project.write(
            "microservices/auth/settings.json",
            r#"{"name": "auth", "env": {"JWT_SECRET": "changeme"}}"#,
        );
        project.write(
            "microservices/mailer/settings.json",
            r#"{"env": {"SMTP_HOST": "localhost", "SMTP_PORT": "1025"}}"#,
        );
        project.write("microservices/broken/settings.json", r#"{"env": "#);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write fixture file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
    }

    /// `msctl` pointed at this project, isolated from the user's config.
    pub fn cmd(&self) -> Command {
        let mut cmd = msctl_cmd();
        cmd.env("MSCTL_PROJECT_DIR", self.root())
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env_remove("RUST_LOG");
        cmd
    }
}

/// `assert_cmd::Command` for the compiled `msctl` binary.
pub fn msctl_cmd() -> Command {
    Command::cargo_bin("msctl").expect("Failed to find msctl binary for testing")
}
