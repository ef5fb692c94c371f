use super::backend::StorageMedium;
use crate::error::{FavzError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory storage medium.
///
/// Uses `RefCell` for interior mutability since favz is single-threaded.
/// The simulation switches let tests drive every failure path of the store.
#[derive(Debug, Default)]
pub struct MemBackend {
    items: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<u64>,
    disabled: Cell<bool>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the total size (key bytes + value bytes over all entries).
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Seed a raw value directly, bypassing quota and simulation switches.
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// When false, every operation fails as if storage were disabled.
    pub fn set_available(&self, available: bool) {
        self.disabled.set(!available);
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Raw view of an entry, bypassing the simulation switches.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn raw_keys(&self) -> Vec<String> {
        self.items.borrow().keys().cloned().collect()
    }

    pub fn used_bytes(&self) -> u64 {
        self.items
            .borrow()
            .iter()
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum()
    }

    fn check_available(&self) -> Result<()> {
        if self.disabled.get() {
            return Err(FavzError::Unavailable("storage is disabled".to_string()));
        }
        Ok(())
    }
}

impl StorageMedium for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        if self.simulate_write_error.get() {
            return Err(FavzError::Store("Simulated write error".to_string()));
        }

        if let Some(limit) = self.quota_bytes {
            let existing = self
                .items
                .borrow()
                .get(key)
                .map(|v| (key.len() + v.len()) as u64)
                .unwrap_or(0);
            let needed =
                self.used_bytes().saturating_sub(existing) + (key.len() + value.len()) as u64;
            if needed > limit {
                return Err(FavzError::QuotaExceeded { needed, limit });
            }
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check_available()?;
        Ok(self.raw_keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mem = MemBackend::new();
        mem.set_item("k", "v").unwrap();
        assert_eq!(mem.get_item("k").unwrap().as_deref(), Some("v"));
        mem.remove_item("k").unwrap();
        assert_eq!(mem.get_item("k").unwrap(), None);
        mem.remove_item("k").unwrap();
    }

    #[test]
    fn quota_counts_keys_and_values() {
        let mem = MemBackend::new().with_quota(10);
        mem.set_item("ab", "12345678").unwrap();
        let err = mem.set_item("c", "1").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(mem.raw("c"), None);

        // Replacing an entry only counts the difference.
        mem.set_item("ab", "87654321").unwrap();
        assert_eq!(mem.raw("ab").as_deref(), Some("87654321"));
    }

    #[test]
    fn unavailable_fails_everything() {
        let mem = MemBackend::new().with_item("k", "v");
        mem.set_available(false);
        assert!(mem.get_item("k").is_err());
        assert!(mem.set_item("k", "w").is_err());
        assert!(mem.keys().is_err());
        assert_eq!(mem.raw("k").as_deref(), Some("v"));
    }

    #[test]
    fn simulated_write_error_leaves_value() {
        let mem = MemBackend::new().with_item("k", "v");
        mem.set_simulate_write_error(true);
        assert!(mem.set_item("k", "w").is_err());
        assert_eq!(mem.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
