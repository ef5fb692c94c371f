use crate::error::Result;

/// Abstract interface for a string key-value storage medium.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `FavoritesStore` handles the "what" (validation, caching, recovery).
/// All methods take `&self`: implementations handle their own mutability.
pub trait StorageMedium {
    /// Read the raw value under `key`.
    /// Returns Ok(None) if the key does not exist.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    /// Must be all-or-nothing: on error the previous value is untouched.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently present, in no particular order.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<M: StorageMedium + ?Sized> StorageMedium for &M {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<M: StorageMedium + ?Sized> StorageMedium for std::rc::Rc<M> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
