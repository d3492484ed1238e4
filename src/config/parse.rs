//! Configuration file loading and writing

use crate::config::paths::Paths;
use crate::config::schema::{
    get_path, set_path, validate_key, validate_tree, CREDENTIAL_KEY, STRING_KEYS,
};
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, Result};
use crate::sync::{Credential, CredentialStore};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns `config.yml`: the typed view plus the raw tree it was read from
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
    raw: Value,
    pub config: Config,
}

impl ConfigManager {
    /// Load the configuration for a data directory
    pub fn load(paths: &Paths) -> Result<Self> {
        Self::load_file(&paths.config_file())
    }

    /// Load a configuration file; a missing file yields defaults
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(contents) => parse_config(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Value::Null
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                }
                .into())
            }
        };

        let config = validate_tree(&raw)?;

        Ok(ConfigManager {
            path: path.to_path_buf(),
            raw,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a dotted key
    pub fn get_key(&self, key: &str) -> ConfigResult<Option<&Value>> {
        validate_key(key)?;
        Ok(get_path(&self.raw, key))
    }

    /// Set a dotted key and write the file back
    pub fn set_key(&mut self, key: &str, value: Value) -> Result<()> {
        validate_key(key)?;

        let mut raw = self.raw.clone();
        set_path(&mut raw, key, value)?;
        let config = validate_tree(&raw)?;

        self.raw = raw;
        self.config = config;
        self.save()
    }

    /// Write the current tree to disk
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_yaml::to_string(&self.raw)?;
        fs::write(&self.path, contents)?;
        tracing::debug!(path = %self.path.display(), "wrote config file");
        Ok(())
    }
}

impl CredentialStore for ConfigManager {
    fn load_credential(&self) -> Option<Credential> {
        self.config.googledrive.oauthtoken.clone()
    }

    fn save_credential(&mut self, credential: &Credential) -> Result<()> {
        let value = serde_yaml::to_value(credential)?;
        self.set_key(CREDENTIAL_KEY, value)
    }
}

/// Parse configuration text into a raw YAML tree
pub fn parse_config(yaml: &str) -> Result<Value> {
    if yaml.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Parse a value given on the command line for a key
pub fn parse_value(key: &str, text: &str) -> Value {
    if STRING_KEYS.contains(&key) {
        return Value::String(text.to_string());
    }
    serde_yaml::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::load_file(&temp_dir.path().join("config.yml")).unwrap();
        assert_eq!(manager.config, Config::default());
    }

    #[test]
    fn test_set_key_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        let mut manager = ConfigManager::load_file(&path).unwrap();
        manager
            .set_key("backend", Value::from("googledrive"))
            .unwrap();

        let reloaded = ConfigManager::load_file(&path).unwrap();
        assert_eq!(reloaded.config.backend, BackendKind::GoogleDrive);
    }

    #[test]
    fn test_invalid_value_is_not_written() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        let mut manager = ConfigManager::load_file(&path).unwrap();
        let result = manager.set_key("googledrive.timeout_secs", Value::from("soon"));

        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(manager.config.googledrive.timeout_secs, 30);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");
        fs::write(&path, "backend: [unclosed").unwrap();

        assert!(ConfigManager::load_file(&path).is_err());
    }

    #[test]
    fn test_parse_value_scalars() {
        assert_eq!(parse_value("googledrive.timeout_secs", "30"), Value::from(30));
        assert_eq!(parse_value("backend", "googledrive"), Value::from("googledrive"));
        assert_eq!(parse_value(CREDENTIAL_KEY, "a: [b"), Value::from("a: [b"));
    }

    #[test]
    fn test_text_keys_keep_numeric_looking_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        let mut manager = ConfigManager::load_file(&path).unwrap();
        manager
            .set_key("googledrive.secretfile", parse_value("googledrive.secretfile", "2024"))
            .unwrap();

        let reloaded = ConfigManager::load_file(&path).unwrap();
        assert_eq!(reloaded.config.googledrive.secretfile.as_deref(), Some("2024"));
    }

    #[test]
    fn test_credential_round_trip_through_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        let mut manager = ConfigManager::load_file(&path).unwrap();
        let credential = Credential::bearer("token-1", None);
        manager.save_credential(&credential).unwrap();

        let reloaded = ConfigManager::load_file(&path).unwrap();
        assert_eq!(reloaded.load_credential(), Some(credential));
    }
}
