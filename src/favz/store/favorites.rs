use super::backend::StorageMedium;
use super::probe::{is_storage_available, SENTINEL_KEY};
use super::recovery::{backup_prefix, load_collection, LoadOutcome, RecoveryReport, BACKUP_INFIX};
use crate::clock::{Clock, SystemClock};
use crate::error::{FavzError, Result};
use crate::grouping::{group_by_category, GroupedFavorites, OTHER_CATEGORY};
use crate::identity::generate_id;
use crate::model::{Book, FavoriteRecord};
use crate::notify::{Notifier, Severity, Silent};
use std::fmt;
use tracing::{debug, error, info, warn};

pub const DEFAULT_STORAGE_KEY: &str = "bookFavorites";

/// Keys the store cannot own: empty, the probe sentinel, or anything inside
/// the quarantine namespace of another key.
pub fn check_storage_key(key: &str) -> Result<()> {
    if key.is_empty() || key == SENTINEL_KEY || key.contains(BACKUP_INFIX) {
        return Err(FavzError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// The in-process copy of the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheState {
    #[default]
    Unloaded,
    /// Records in storage order.
    Loaded(Vec<FavoriteRecord>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DuplicateId,
    InvalidInput,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    QuotaExceeded,
    MediumUnavailable,
    WriteFailed,
}

/// Result of a mutation. Nothing was written unless this is `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Ok,
    Rejected(RejectReason),
    Failed(FailReason),
}

impl StoreOutcome {
    pub fn is_ok(self) -> bool {
        matches!(self, StoreOutcome::Ok)
    }
}

impl fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreOutcome::Ok => "ok",
            StoreOutcome::Rejected(RejectReason::DuplicateId) => "already a favorite",
            StoreOutcome::Rejected(RejectReason::InvalidInput) => "invalid input",
            StoreOutcome::Rejected(RejectReason::NotFound) => "not found",
            StoreOutcome::Failed(FailReason::QuotaExceeded) => "storage full",
            StoreOutcome::Failed(FailReason::MediumUnavailable) => "storage unavailable",
            StoreOutcome::Failed(FailReason::WriteFailed) => "write failed",
        };
        f.write_str(s)
    }
}

/// The favorites collection: lazy-loaded, cached, written through on every change.
///
/// Every mutation is whole-collection: the loaded records are copied, changed,
/// serialized and written back under one key; the cache is replaced only
/// after the write succeeds. Ordinary failures never surface as errors; they
/// become a [`StoreOutcome`] (or `false`) plus a notification.
///
/// Another process writing the same key is not observed until
/// [`reset_cache`](Self::reset_cache) is called; the last writer wins.
pub struct FavoritesStore<M: StorageMedium, C: Clock = SystemClock> {
    medium: M,
    clock: C,
    key: String,
    other_label: String,
    cache: CacheState,
    notifier: Box<dyn Notifier>,
    unavailable_reported: bool,
    last_report: Option<RecoveryReport>,
}

impl<M: StorageMedium> FavoritesStore<M, SystemClock> {
    pub fn with_medium(medium: M) -> Self {
        Self::new(medium, SystemClock)
    }
}

impl<M: StorageMedium, C: Clock> FavoritesStore<M, C> {
    pub fn new(medium: M, clock: C) -> Self {
        Self {
            medium,
            clock,
            key: DEFAULT_STORAGE_KEY.to_string(),
            other_label: OTHER_CATEGORY.to_string(),
            cache: CacheState::Unloaded,
            notifier: Box::new(Silent),
            unavailable_reported: false,
            last_report: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        check_storage_key(&key)?;
        self.key = key;
        self.cache = CacheState::Unloaded;
        Ok(self)
    }

    /// Bucket name for records without a category.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.other_label = label.into();
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn other_label(&self) -> &str {
        &self.other_label
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn cache_state(&self) -> &CacheState {
        &self.cache
    }

    /// Report from the most recent load, if one has happened.
    pub fn last_report(&self) -> Option<&RecoveryReport> {
        self.last_report.as_ref()
    }

    // --- Mutations ---

    pub fn add(&mut self, book: &Book) -> bool {
        self.add_book(book).is_ok()
    }

    pub fn add_book(&mut self, book: &Book) -> StoreOutcome {
        if !book.is_valid() {
            debug!(title = %book.title, author = %book.author, "rejecting book without title/author");
            return StoreOutcome::Rejected(RejectReason::InvalidInput);
        }

        let id = generate_id(&book.title, &book.author);
        let current = self.records();
        if current.iter().any(|r| r.id == id) {
            debug!(id = %id, "book already in favorites");
            return StoreOutcome::Rejected(RejectReason::DuplicateId);
        }

        let mut next = current.to_vec();
        next.push(FavoriteRecord::from_book(
            id.clone(),
            book,
            self.clock.now_millis(),
        ));

        let outcome = self.commit(next);
        if outcome.is_ok() {
            info!(id = %id, title = %book.title, "added favorite");
        }
        outcome
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.remove_entry(id).is_ok()
    }

    pub fn remove_entry(&mut self, id: &str) -> StoreOutcome {
        if id.is_empty() {
            return StoreOutcome::Rejected(RejectReason::InvalidInput);
        }

        let current = self.records();
        if !current.iter().any(|r| r.id == id) {
            debug!(id, "nothing to remove");
            return StoreOutcome::Rejected(RejectReason::NotFound);
        }

        let next: Vec<FavoriteRecord> = current.iter().filter(|r| r.id != id).cloned().collect();
        let outcome = self.commit(next);
        if outcome.is_ok() {
            info!(id, "removed favorite");
        }
        outcome
    }

    // --- Queries ---

    pub fn is_favorite(&mut self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.records().iter().any(|r| r.id == id)
    }

    /// All records, most recently added first. Equal timestamps keep storage order.
    pub fn get_all(&mut self) -> Vec<FavoriteRecord> {
        let mut all = self.records().to_vec();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all
    }

    /// Records bucketed by category, recomputed from [`get_all`](Self::get_all) on every call.
    pub fn get_grouped_by_category(&mut self) -> GroupedFavorites {
        let all = self.get_all();
        group_by_category(&all, &self.other_label)
    }

    pub fn len(&mut self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.records().is_empty()
    }

    /// Forget the cache; the next access reloads from storage.
    pub fn reset_cache(&mut self) {
        debug!(key = %self.key, "cache reset");
        self.cache = CacheState::Unloaded;
    }

    /// Reload from storage through the recovery path and return its report.
    pub fn recover(&mut self) -> RecoveryReport {
        self.reset_cache();
        self.load()
    }

    /// Backup keys holding quarantined payloads for this store's key, oldest first.
    pub fn quarantine_keys(&self) -> Vec<String> {
        let prefix = backup_prefix(&self.key);
        let mut keys: Vec<String> = match self.medium.keys() {
            Ok(keys) => keys.into_iter().filter(|k| k.starts_with(&prefix)).collect(),
            Err(e) => {
                warn!(error = %e, "cannot list storage keys");
                Vec::new()
            }
        };
        keys.sort_by_key(|k| {
            k[prefix.len()..]
                .parse::<i64>()
                .unwrap_or(i64::MAX)
        });
        keys
    }

    // --- Internals ---

    fn records(&mut self) -> &[FavoriteRecord] {
        if let CacheState::Unloaded = self.cache {
            self.load();
        }

        match &self.cache {
            CacheState::Loaded(records) => records.as_slice(),
            CacheState::Unloaded => &[],
        }
    }

    fn load(&mut self) -> RecoveryReport {
        let (records, report) = load_collection(&self.medium, &self.key, self.clock.now_millis());
        self.report_load(&report);
        self.cache = CacheState::Loaded(records);
        self.last_report = Some(report.clone());
        report
    }

    fn commit(&mut self, next: Vec<FavoriteRecord>) -> StoreOutcome {
        if !is_storage_available(&self.medium) {
            self.report_unavailable();
            return StoreOutcome::Failed(FailReason::MediumUnavailable);
        }

        let written = serde_json::to_string(&next)
            .map_err(FavzError::from)
            .and_then(|json| self.medium.set_item(&self.key, &json));

        match written {
            Ok(()) => {
                self.cache = CacheState::Loaded(next);
                StoreOutcome::Ok
            }
            Err(e) if e.is_quota_exceeded() => {
                error!(key = %self.key, error = %e, "storage quota exceeded");
                self.notify(
                    "Storage is full: the favorite could not be saved. Remove some favorites and try again.",
                    Severity::Error,
                );
                StoreOutcome::Failed(FailReason::QuotaExceeded)
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save favorites");
                self.notify(&format!("Failed to save favorites: {}", e), Severity::Error);
                StoreOutcome::Failed(FailReason::WriteFailed)
            }
        }
    }

    fn report_load(&mut self, report: &RecoveryReport) {
        match report.outcome {
            LoadOutcome::Unavailable => self.report_unavailable(),
            LoadOutcome::ReadFailed => {
                let detail = report.detail.as_deref().unwrap_or("unknown error");
                self.notify(
                    &format!("Could not read saved favorites: {}", detail),
                    Severity::Error,
                );
            }
            LoadOutcome::Quarantined => {
                let message = match &report.quarantine_key {
                    Some(backup) => format!(
                        "Saved favorites were corrupted and have been reset. The original data was kept under \"{}\".",
                        backup
                    ),
                    None => "Saved favorites were corrupted and have been reset. The original data could not be backed up.".to_string(),
                };
                self.notify(&message, Severity::Error);
            }
            LoadOutcome::Healed => {
                self.notify(
                    &format!(
                        "Removed {} invalid favorite(s) from storage; {} kept.",
                        report.dropped, report.kept
                    ),
                    Severity::Warning,
                );
            }
            LoadOutcome::Empty | LoadOutcome::Clean => {}
        }
    }

    fn report_unavailable(&mut self) {
        if self.unavailable_reported {
            return;
        }
        self.unavailable_reported = true;
        warn!(key = %self.key, "storage unavailable");
        self.notify(
            "Local storage is unavailable: favorites will not be saved.",
            Severity::Warning,
        );
    }

    fn notify(&self, message: &str, severity: Severity) {
        debug!(%severity, notice = message, "notify");
        self.notifier.notify(message, severity);
    }
}
