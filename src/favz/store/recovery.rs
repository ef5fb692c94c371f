//! The load path: read the primary slot, validate it, and repair it in place.
//!
//! Every path through [`load_collection`] ends with the slot and the returned
//! collection agreeing with each other and the slot holding a JSON array (or
//! the medium being unusable, in which case nothing is written).
//!
//! ```text
//! unavailable        -> []                              (nothing touched)
//! absent / ""        -> []
//! not JSON           -> quarantine raw, slot = "[]", []
//! JSON, not an array -> quarantine raw, slot = "[]", []
//! array              -> keep valid records; rewrite slot if any were dropped
//! ```

use super::backend::StorageMedium;
use super::probe::is_storage_available;
use crate::model::FavoriteRecord;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

pub const BACKUP_INFIX: &str = "_backup_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    /// The probe failed; the collection is empty for this session.
    Unavailable,
    /// The probe passed but reading the slot failed.
    ReadFailed,
    /// Nothing stored yet.
    Empty,
    /// Stored data was fully valid.
    Clean,
    /// Some records were invalid and have been dropped.
    Healed,
    /// The payload was unusable and has been moved to a backup key.
    Quarantined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    pub outcome: LoadOutcome,
    pub kept: usize,
    pub dropped: usize,
    /// Where the corrupt payload went. `None` if nothing was quarantined or
    /// the backup write failed.
    pub quarantine_key: Option<String>,
    /// The repaired collection could not be written back.
    pub rewrite_failed: bool,
    /// Error text when the slot could not be read or backed up.
    pub detail: Option<String>,
}

impl RecoveryReport {
    fn new(outcome: LoadOutcome) -> Self {
        Self {
            outcome,
            kept: 0,
            dropped: 0,
            quarantine_key: None,
            rewrite_failed: false,
            detail: None,
        }
    }
}

pub fn backup_prefix(key: &str) -> String {
    format!("{}{}", key, BACKUP_INFIX)
}

/// Run one load attempt against `key`. `now_millis` stamps any quarantine key.
pub fn load_collection<M: StorageMedium + ?Sized>(
    medium: &M,
    key: &str,
    now_millis: i64,
) -> (Vec<FavoriteRecord>, RecoveryReport) {
    if !is_storage_available(medium) {
        return (Vec::new(), RecoveryReport::new(LoadOutcome::Unavailable));
    }

    let raw = match medium.get_item(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => {
            debug!(key, "no stored favorites");
            return (Vec::new(), RecoveryReport::new(LoadOutcome::Empty));
        }
        Err(e) => {
            error!(key, error = %e, "failed to read favorites");
            let mut report = RecoveryReport::new(LoadOutcome::ReadFailed);
            report.detail = Some(e.to_string());
            return (Vec::new(), report);
        }
    };

    let items = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(key, kind = value_kind(&other), "stored favorites are not an array");
            return (Vec::new(), quarantine(medium, key, &raw, now_millis));
        }
        Err(e) => {
            warn!(key, error = %e, "stored favorites are not valid JSON");
            return (Vec::new(), quarantine(medium, key, &raw, now_millis));
        }
    };

    let total = items.len();
    let records: Vec<FavoriteRecord> = items.iter().filter_map(FavoriteRecord::from_value).collect();
    let dropped = total - records.len();

    if dropped == 0 {
        let mut report = RecoveryReport::new(LoadOutcome::Clean);
        report.kept = records.len();
        debug!(key, count = records.len(), "loaded favorites");
        return (records, report);
    }

    warn!(key, dropped, kept = records.len(), "dropping invalid favorites");
    let mut report = RecoveryReport::new(LoadOutcome::Healed);
    report.kept = records.len();
    report.dropped = dropped;

    let rewritten = serde_json::to_string(&records)
        .map_err(crate::error::FavzError::from)
        .and_then(|json| medium.set_item(key, &json));
    if let Err(e) = rewritten {
        error!(key, error = %e, "failed to write back repaired favorites");
        report.rewrite_failed = true;
        report.detail = Some(e.to_string());
    }

    (records, report)
}

/// Copy `raw` to a fresh backup key, then reset the slot to an empty array.
///
/// If the medium is too full for the copy, the primary is removed first and
/// the copy retried in the space it occupied. Any other backup failure leaves
/// the primary untouched.
fn quarantine<M: StorageMedium + ?Sized>(
    medium: &M,
    key: &str,
    raw: &str,
    now_millis: i64,
) -> RecoveryReport {
    let mut report = RecoveryReport::new(LoadOutcome::Quarantined);
    let backup_key = free_backup_key(medium, key, now_millis);

    let mut primary_cleared = false;
    let mut backed_up = medium.set_item(&backup_key, raw);
    if matches!(&backed_up, Err(e) if e.is_quota_exceeded()) {
        match medium.remove_item(key) {
            Ok(()) => {
                primary_cleared = true;
                backed_up = medium.set_item(&backup_key, raw);
            }
            Err(e) => warn!(key, error = %e, "failed to clear corrupt favorites before backup"),
        }
    }

    match backed_up {
        Ok(()) => {
            warn!(key, backup = %backup_key, bytes = raw.len(), "quarantined corrupt favorites");
            report.quarantine_key = Some(backup_key);
        }
        Err(e) => {
            error!(key, error = %e, "failed to back up corrupt favorites");
            report.detail = Some(e.to_string());
            if !primary_cleared {
                warn!(key, "leaving corrupt favorites in place");
                return report;
            }
        }
    }

    if let Err(e) = medium.set_item(key, "[]") {
        error!(key, error = %e, "failed to reset favorites");
        report.rewrite_failed = true;
        report.detail.get_or_insert_with(|| e.to_string());
    }

    report
}

fn free_backup_key<M: StorageMedium + ?Sized>(medium: &M, key: &str, now_millis: i64) -> String {
    let existing = medium.keys().unwrap_or_default();
    let prefix = backup_prefix(key);
    let mut stamp = now_millis;
    loop {
        let candidate = format!("{}{}", prefix, stamp);
        if !existing.contains(&candidate) {
            return candidate;
        }
        stamp += 1;
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
