use super::backend::StorageMedium;
use crate::error::{FavzError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed storage medium: one file per key inside `root`.
///
/// Writes go to a hidden temp file first and are renamed into place, so a
/// concurrent reader sees either the old or the new value, never a torn one.
/// Files whose names are not valid keys, including every name starting with
/// `.`, are never treated as keys and do not count against the quota.
pub struct FsBackend {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quota_bytes: None,
        }
    }

    /// Cap the total size (key bytes + value bytes over all entries).
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| {
                FavzError::Unavailable(format!("cannot create {}: {}", self.root.display(), e))
            })?;
        }
        Ok(())
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(FavzError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn entry_size(&self, key: &str) -> Result<u64> {
        let path = self.key_path(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(key.len() as u64 + meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(FavzError::Io(e)),
        }
    }

    fn used_bytes(&self) -> Result<u64> {
        let mut total = 0;
        for key in self.keys()? {
            total += self.entry_size(&key)?;
        }
        Ok(total)
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl StorageMedium for FsBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FavzError::Io(e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_dir()?;

        if let Some(limit) = self.quota_bytes {
            let needed = self
                .used_bytes()?
                .saturating_sub(self.entry_size(key)?)
                + (key.len() + value.len()) as u64;
            if needed > limit {
                return Err(FavzError::QuotaExceeded { needed, limit });
            }
        }

        // Atomic Write
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, value) {
            let _ = fs::remove_file(&tmp_path);
            return Err(FavzError::Io(e));
        }
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            FavzError::Io(e)
        })?;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FavzError::Io(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(FavzError::Io)? {
            let entry = entry.map_err(FavzError::Io)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                // Hidden temp files and foreign names (sync conflict copies etc.) are not ours.
                if is_valid_key(name) {
                    keys.push(name.to_string());
                }
            }
        }
        Ok(keys)
    }
}
