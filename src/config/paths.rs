//! Data directory discovery
//!
//! Everything yata persists lives in one directory: `$YATA_HOME` when set,
//! otherwise `~/.yata`.

use crate::error::{ConfigError, ConfigResult};
use directories::BaseDirs;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "YATA_HOME";

/// Name of the task data file, locally and on the remote
pub const TASKS_FILE_NAME: &str = "tasks.json";

/// Name of the identity marker file holding the last assigned task ID
pub const ID_FILE_NAME: &str = ".yataid";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yml";

const DEFAULT_DIR_NAME: &str = ".yata";

/// Resolved locations of yata's files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Use an explicit data directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Paths { root: root.into() }
    }

    /// Resolve the data directory from the environment
    pub fn discover() -> ConfigResult<Self> {
        if let Some(root) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Paths::new(root));
        }

        let base = BaseDirs::new().ok_or_else(|| {
            ConfigError::Invalid(format!(
                "Unable to locate a home directory; set {} instead",
                HOME_ENV
            ))
        })?;

        Ok(Paths::new(base.home_dir().join(DEFAULT_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.root.join(TASKS_FILE_NAME)
    }

    pub fn id_file(&self) -> PathBuf {
        self.root.join(ID_FILE_NAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Resolve a path from the config relative to the data directory
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
