//! # Storage Layer
//!
//! Favorites live in a single slot of a string key-value medium, the same
//! shape as a browser's local storage. The [`StorageMedium`] trait is that
//! medium; [`FavoritesStore`] is everything favz does on top of it.
//!
//! ## Medium vs Store
//!
//! - **Medium** ([`backend::StorageMedium`]): raw `get/set/remove/keys` on strings.
//!   Knows nothing about favorites.
//! - **Store** ([`favorites::FavoritesStore`]): identity, validation, caching,
//!   whole-collection writes, recovery and notifications.
//!
//! ## Load Path
//!
//! The first access after construction (or after `reset_cache`) runs
//! [`recovery::load_collection`]:
//!
//! 1. **Probe**: write-then-delete a sentinel. Failing that, the collection is
//!    empty for the session and writes are refused.
//! 2. **Read**: an absent or empty slot is an empty collection.
//! 3. **Quarantine**: a payload that is not JSON, or not a JSON array, is moved
//!    verbatim to `<key>_backup_<ms>` and the slot is reset to `[]`.
//! 4. **Filter**: array elements without non-empty string `id`, `title` and
//!    `author` are dropped; if any were, the slot is rewritten.
//!
//! ## Write Path
//!
//! Every mutation copies the cached collection, changes the copy, probes the
//! medium and writes the whole array back. The cache is replaced only when the
//! write succeeded, so a failed write leaves memory and storage as they were.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key in a directory, atomic writes,
//!   optional byte quota. Used by the CLI.
//! - [`mem_backend::MemBackend`]: in-memory, with switches to simulate a
//!   disabled medium, failing writes and a byte quota. Used in tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── config.json                    # FavzConfig
//! └── storage/
//!     ├── bookFavorites              # JSON array of FavoriteRecord
//!     └── bookFavorites_backup_<ms>  # Quarantined raw payloads
//! ```

pub mod backend;
pub mod favorites;
pub mod fs_backend;
pub mod mem_backend;
pub mod probe;
pub mod recovery;

pub use backend::StorageMedium;
pub use favorites::{
    check_storage_key, CacheState, FailReason, FavoritesStore, RejectReason, StoreOutcome,
    DEFAULT_STORAGE_KEY,
};
pub use probe::is_storage_available;
pub use recovery::{LoadOutcome, RecoveryReport};
