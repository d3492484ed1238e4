//! Error types for Yata

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Yata operations
pub type Result<T> = std::result::Result<T, YataError>;

/// Main error type for Yata
#[derive(Error, Debug)]
pub enum YataError {
    /// Task store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Remote sync errors
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing errors
    #[error("JSON parsing error")]
    Json(#[from] serde_json::Error),
}

/// Task store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unable to {action} '{path}': {message}")]
    Storage {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("Task {0} does not exist")]
    NotFound(u32),

    #[error("A task needs a description")]
    EmptyDescription,
}

/// Remote sync errors
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{0}")]
    Configuration(String),

    #[error("Unable to authorize: {0}")]
    Credential(String),

    #[error("Unable to read '{name}' from '{path}'")]
    Transfer {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Remote {operation} failed{}: {message}", describe_target(.name))]
    Remote {
        operation: &'static str,
        name: Option<String>,
        message: String,
    },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

fn describe_target(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" for '{}'", name),
        None => String::new(),
    }
}

/// Specialized result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Specialized result type for sync operations
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl StoreError {
    pub(crate) fn storage(action: &'static str, path: impl Into<PathBuf>, err: impl ToString) -> Self {
        StoreError::Storage {
            action,
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl SyncError {
    pub(crate) fn remote(operation: &'static str, name: Option<&str>, err: impl ToString) -> Self {
        SyncError::Remote {
            operation,
            name: name.map(str::to_string),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_names_file() {
        let err = SyncError::remote("update", Some("tasks.json"), "HTTP 500");
        assert_eq!(
            err.to_string(),
            "Remote update failed for 'tasks.json': HTTP 500"
        );
    }

    #[test]
    fn test_remote_error_without_file() {
        let err = SyncError::remote("list", None, "timed out");
        assert_eq!(err.to_string(), "Remote list failed: timed out");
    }

    #[test]
    fn test_not_found_message() {
        let err: YataError = StoreError::NotFound(7).into();
        assert_eq!(err.to_string(), "Task 7 does not exist");
    }

    #[test]
    fn test_error_chain_has_no_repeated_messages() {
        let err: YataError = ConfigError::Invalid("missing field `access_token`".to_string()).into();
        let chain = format!("{:#}", anyhow::Error::new(err).context("failed to load configuration"));
        assert_eq!(
            chain,
            "failed to load configuration: Invalid configuration: missing field `access_token`"
        );

        let io = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: YataError = io.into();
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain, "I/O error: gone");
    }
}
