//! Core configuration types
//!
//! This module defines the data structures stored in `config.yml`.

use crate::sync::Credential;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Which sync backend `push`/`fetch` talk to
    #[serde(default)]
    pub backend: BackendKind,

    /// Google Drive settings
    #[serde(default)]
    pub googledrive: GoogleDriveConfig,
}

/// Available sync backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    None,
    #[serde(alias = "google-drive", alias = "gdrive")]
    GoogleDrive,
}

/// Settings for the Google Drive backend
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GoogleDriveConfig {
    /// OAuth client secret JSON downloaded from the Google console,
    /// relative to the data directory unless absolute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secretfile: Option<String>,

    /// Stored access credential; an unreadable one counts as absent
    #[serde(
        default,
        deserialize_with = "lenient_credential",
        skip_serializing_if = "Option::is_none"
    )]
    pub oauthtoken: Option<Credential>,

    /// Timeout applied to every Drive request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn lenient_credential<'de, D>(deserializer: D) -> Result<Option<Credential>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        Some(value) => value,
        None => return Ok(None),
    };

    match serde_yaml::from_value(value) {
        Ok(credential) => Ok(Some(credential)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable stored credential");
            Ok(None)
        }
    }
}

impl Default for GoogleDriveConfig {
    fn default() -> Self {
        GoogleDriveConfig {
            secretfile: None,
            oauthtoken: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}
