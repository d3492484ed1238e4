//! Configuration keys and validation
//!
//! Keys are dotted paths into the YAML document (`googledrive.secretfile`).
//! Edits are applied to the raw value tree and then validated by
//! deserializing the result back into [`Config`].

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use serde_yaml::{Mapping, Value};

/// Key under which the sync credential is persisted
pub const CREDENTIAL_KEY: &str = "googledrive.oauthtoken";

/// Every key `yata config` accepts
pub const KNOWN_KEYS: &[&str] = &[
    "backend",
    "googledrive.secretfile",
    "googledrive.timeout_secs",
    CREDENTIAL_KEY,
];

/// Keys whose values are always text, even when they look like numbers
pub const STRING_KEYS: &[&str] = &["backend", "googledrive.secretfile"];

/// Check that a key is one yata knows about
pub fn validate_key(key: &str) -> ConfigResult<()> {
    if KNOWN_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(ConfigError::UnknownKey(key.to_string()))
    }
}

/// Look up a dotted key in a YAML tree
pub fn get_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(root, |node, segment| node.as_mapping()?.get(segment))
}

/// Set a dotted key in a YAML tree, creating intermediate mappings
pub fn set_path(root: &mut Value, key: &str, value: Value) -> ConfigResult<()> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }

    let mut node = root;
    for segment in &segments[..segments.len() - 1] {
        if !node.is_mapping() {
            *node = Value::Mapping(Mapping::new());
        }
        let map = node
            .as_mapping_mut()
            .ok_or_else(|| ConfigError::Invalid(format!("'{}' is not a section", segment)))?;
        node = map
            .entry(Value::String(segment.to_string()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    if !node.is_mapping() {
        *node = Value::Mapping(Mapping::new());
    }
    if let Some(map) = node.as_mapping_mut() {
        let leaf = segments[segments.len() - 1];
        map.insert(Value::String(leaf.to_string()), value);
    }

    Ok(())
}

/// Validate a raw YAML tree and convert it into a [`Config`]
pub fn validate_tree(root: &Value) -> ConfigResult<Config> {
    let value = if root.is_null() {
        Value::Mapping(Mapping::new())
    } else {
        root.clone()
    };

    serde_yaml::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
}
