//! Common test utilities

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use yata::config::Paths;

/// Create an empty temporary data directory
pub fn create_data_dir() -> (TempDir, Paths) {
    let temp_dir = TempDir::new().unwrap();
    let paths = Paths::new(temp_dir.path());
    (temp_dir, paths)
}

/// Create a data directory with a config.yml
pub fn create_data_dir_with_config(content: &str) -> (TempDir, Paths) {
    let (temp_dir, paths) = create_data_dir();
    fs::write(paths.config_file(), content).unwrap();
    (temp_dir, paths)
}

/// The yata binary, pointed at a data directory
pub fn yata(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("yata").unwrap();
    cmd.env("YATA_HOME", data_dir)
        .env("NO_COLOR", "1")
        .env_remove("YATA_LOG");
    cmd
}
