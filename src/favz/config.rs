use crate::error::{FavzError, Result};
use crate::grouping::OTHER_CATEGORY;
use crate::store::{check_storage_key, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

pub const CONFIG_KEYS: &[&str] = &["storage-key", "quota-bytes", "other-label"];

/// Configuration for favz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavzConfig {
    /// Primary key the collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Total bytes the storage directory may hold; 0 means unlimited
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,

    /// Group name for favorites without a category
    #[serde(default = "default_other_label")]
    pub other_label: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_quota_bytes() -> u64 {
    DEFAULT_QUOTA_BYTES
}

fn default_other_label() -> String {
    OTHER_CATEGORY.to_string()
}

impl Default for FavzConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            quota_bytes: default_quota_bytes(),
            other_label: default_other_label(),
        }
    }
}

impl FavzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FavzError::Io)?;
        let config: FavzConfig =
            serde_json::from_str(&content).map_err(FavzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FavzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FavzError::Serialization)?;
        fs::write(config_path, content).map_err(FavzError::Io)?;
        Ok(())
    }

    /// The byte quota, or `None` when unlimited
    pub fn quota(&self) -> Option<u64> {
        (self.quota_bytes > 0).then_some(self.quota_bytes)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "storage-key" => Some(self.storage_key.clone()),
            "quota-bytes" => Some(self.quota_bytes.to_string()),
            "other-label" => Some(self.other_label.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "storage-key" => {
                let valid = !value.is_empty()
                    && !value.starts_with('.')
                    && value
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
                if !valid || check_storage_key(value).is_err() {
                    return Err(format!("Invalid storage key: {}", value));
                }
                self.storage_key = value.to_string();
            }
            "quota-bytes" => {
                self.quota_bytes = value
                    .parse()
                    .map_err(|_| format!("quota-bytes must be a whole number, got {}", value))?;
            }
            "other-label" => {
                if value.is_empty() {
                    return Err("other-label cannot be empty".to_string());
                }
                self.other_label = value.to_string();
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FavzConfig::default();
        assert_eq!(config.storage_key, "bookFavorites");
        assert_eq!(config.quota(), Some(5 * 1024 * 1024));
        assert_eq!(config.other_label, "其他");
    }

    #[test]
    fn test_zero_quota_is_unlimited() {
        let mut config = FavzConfig::default();
        config.set("quota-bytes", "0").unwrap();
        assert_eq!(config.quota(), None);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = FavzConfig::default();
        assert!(config.set("storage-key", "../escape").is_err());
        assert!(config.set("storage-key", ".hidden").is_err());
        assert!(config.set("quota-bytes", "lots").is_err());
        assert!(config.set("other-label", "").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, FavzConfig::default());
    }

    #[test]
    fn test_storage_key_rejects_reserved_names() {
        let mut config = FavzConfig::default();
        assert!(config.set("storage-key", "__storage_test__").is_err());
        assert!(config.set("storage-key", "bookFavorites_backup_1").is_err());
        assert!(config.set("storage-key", "shelf_backup_").is_err());
        assert_eq!(config.storage_key, "bookFavorites");

        config.set("storage-key", "shelf.v2").unwrap();
        assert_eq!(config.storage_key, "shelf.v2");
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = FavzConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(config.get("nope"), None);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = FavzConfig::load(temp_dir.path().join("absent")).unwrap();
        assert_eq!(config, FavzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = FavzConfig::default();
        config.set("other-label", "Other").unwrap();
        config.set("storage-key", "shelf").unwrap();
        config.save(temp_dir.path()).unwrap();

        let loaded = FavzConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.other_label, "Other");
        assert_eq!(loaded.storage_key, "shelf");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{"other_label":"Misc"}"#,
        )
        .unwrap();

        let loaded = FavzConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.other_label, "Misc");
        assert_eq!(loaded.storage_key, "bookFavorites");
    }
}
