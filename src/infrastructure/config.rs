//! Engine configuration

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Result};

use crate::application::ports::outbound::{KeyValueStore, StorageError};
use crate::application::services::StorageKeys;

use super::storage::FileKeyValueStore;

/// Directory used for the file-backed store when none is configured
pub const DEFAULT_STORAGE_DIR: &str = "./.dragons";

/// Engine configuration loaded from environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding one file per storage slot
    pub storage_dir: PathBuf,
    /// Slot names for the draft, the edit request and the roster
    pub keys: StorageKeys,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            keys: StorageKeys::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// when present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let value_or = |key: &str, default: String| -> Result<String> {
            match lookup(key) {
                Some(value) => {
                    let value = value.trim().to_string();
                    ensure!(!value.is_empty(), "{} must not be empty", key);
                    Ok(value)
                }
                None => Ok(default),
            }
        };

        Ok(Self {
            storage_dir: PathBuf::from(value_or(
                "DRAGONS_STORAGE_DIR",
                defaults.storage_dir.to_string_lossy().into_owned(),
            )?),
            keys: StorageKeys {
                draft: value_or("DRAGONS_DRAFT_KEY", defaults.keys.draft)?,
                edit_request: value_or("DRAGONS_EDIT_KEY", defaults.keys.edit_request)?,
                roster: value_or("DRAGONS_ROSTER_KEY", defaults.keys.roster)?,
            },
        })
    }

    /// Open the file-backed store under `storage_dir`
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, StorageError> {
        Ok(Arc::new(FileKeyValueStore::open(&self.storage_dir)?))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(config.keys.draft, "dragon_character_creation_v1");
        assert_eq!(config.keys.edit_request, "dragons-edit-character");
        assert_eq!(config.keys.roster, "dragons-characters");
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DRAGONS_STORAGE_DIR", "/tmp/builds"),
            ("DRAGONS_DRAFT_KEY", "draft_v2"),
        ]))
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/builds"));
        assert_eq!(config.keys.draft, "draft_v2");
        assert_eq!(config.keys.roster, "dragons-characters");
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let err = EngineConfig::from_lookup(lookup(&[("DRAGONS_ROSTER_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("DRAGONS_ROSTER_KEY"));
    }

    #[test]
    fn test_open_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            storage_dir: dir.path().join("nested"),
            ..EngineConfig::default()
        };
        let store = config.open_store().unwrap();
        store.set("probe", "1").unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
