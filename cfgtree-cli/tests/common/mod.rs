//! Common test utilities for CLI integration tests.
//!
//! This module provides an isolated environment with its own configuration
//! file and command builders pointed at it.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated configuration file.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the configuration file (not created until a command writes it)
    pub config: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let config = temp_path.join("config.yaml");

        Self {
            temp_dir,
            temp_path,
            config,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// `CFGTREE_FILE` and `CFGTREE_LOG_MODE` are cleared so the host
    /// environment cannot leak into the test.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("cfgtree").expect("Failed to find cfgtree binary");
        cmd.env_remove("CFGTREE_FILE").env_remove("CFGTREE_LOG_MODE");
        cmd
    }

    /// Get a command builder with `--file` pointed at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--file").arg(&self.config);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the temporary directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Register a setting, asserting success.
    pub fn register(&self, path: &str, value: &str) {
        self.command()
            .args(["register", path, value])
            .assert()
            .success();
    }

    /// Register a setting with a comment, asserting success.
    pub fn register_commented(&self, path: &str, value: &str, comment: &str) {
        self.command()
            .args(["register", path, value, "--comment", comment])
            .assert()
            .success();
    }

    /// Current contents of the configuration file.
    pub fn config_text(&self) -> String {
        std::fs::read_to_string(&self.config).expect("Failed to read config")
    }
}
