use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::grouping::category_counts;
use crate::store::{FavoritesStore, LoadOutcome, StorageMedium};

/// Reload the collection through the recovery path and report what it found.
pub fn run<M: StorageMedium, C: Clock>(
    store: &mut FavoritesStore<M, C>,
) -> Result<CmdResult> {
    let report = store.recover();
    let mut result = CmdResult::default();

    let message = match report.outcome {
        LoadOutcome::Unavailable => CmdMessage::error("Storage is unavailable."),
        LoadOutcome::ReadFailed => CmdMessage::error(format!(
            "Could not read favorites: {}",
            report.detail.as_deref().unwrap_or("unknown error")
        )),
        LoadOutcome::Empty => CmdMessage::info("No favorites stored."),
        LoadOutcome::Clean => CmdMessage::success(format!("{} favorite(s), all valid.", report.kept)),
        LoadOutcome::Healed => CmdMessage::warning(format!(
            "Dropped {} invalid record(s), kept {}.",
            report.dropped, report.kept
        )),
        LoadOutcome::Quarantined => CmdMessage::warning(match &report.quarantine_key {
            Some(key) => format!("Unreadable data moved to {}; favorites reset.", key),
            None => "Unreadable data could not be backed up; favorites reset.".to_string(),
        }),
    };
    result.add_message(message);
    if report.rewrite_failed {
        result.add_message(CmdMessage::error("Repaired favorites could not be saved."));
    }

    let all = store.get_all();
    result.counts = category_counts(&all, store.other_label());
    result.quarantined = store.quarantine_keys();
    result.report = Some(report);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::Severity;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn clean_collection_reports_counts() {
        let mem = MemBackend::new().with_item(
            "bookFavorites",
            r#"[{"id":"a","title":"T","author":"A","category":"文学","timestamp":1},
                {"id":"b","title":"U","author":"B","timestamp":2}]"#,
        );
        let mut store = FavoritesStore::new(mem, ManualClock::new(5));
        let result = run(&mut store).unwrap();

        assert_eq!(result.report.unwrap().outcome, LoadOutcome::Clean);
        assert_eq!(result.counts["文学"], 1);
        assert_eq!(result.counts["其他"], 1);
        assert!(result.quarantined.is_empty());
        assert_eq!(result.messages[0].severity, Severity::Success);
    }

    #[test]
    fn corrupt_payload_is_quarantined_and_listed() {
        let mem = MemBackend::new().with_item("bookFavorites", "{broken");
        let mut store = FavoritesStore::new(mem, ManualClock::new(42));
        let result = run(&mut store).unwrap();

        let report = result.report.unwrap();
        assert_eq!(report.outcome, LoadOutcome::Quarantined);
        assert_eq!(result.quarantined, vec!["bookFavorites_backup_42".to_string()]);
        assert_eq!(result.messages[0].severity, Severity::Warning);
        assert_eq!(
            store.medium().raw("bookFavorites_backup_42").as_deref(),
            Some("{broken")
        );
    }

    #[test]
    fn unavailable_storage_is_an_error() {
        let mem = MemBackend::new();
        mem.set_available(false);
        let mut store = FavoritesStore::new(&mem, ManualClock::new(1));
        let result = run(&mut store).unwrap();

        assert_eq!(result.report.unwrap().outcome, LoadOutcome::Unavailable);
        assert_eq!(result.messages[0].severity, Severity::Error);
    }
}
