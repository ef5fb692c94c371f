use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{index_favorites, FavSelector};
use crate::store::{FavoritesStore, RejectReason, StorageMedium, StoreOutcome};

/// Remove each selected favorite. Indexes refer to the listing as it was
/// before the first removal.
pub fn run<M: StorageMedium, C: Clock>(
    store: &mut FavoritesStore<M, C>,
    selectors: &[FavSelector],
) -> Result<CmdResult> {
    let indexed = index_favorites(store.get_all());
    let mut result = CmdResult::default();
    let mut removed = Vec::new();

    for selector in selectors {
        let Some(id) = selector.resolve(&indexed) else {
            result.add_message(CmdMessage::error(format!(
                "No favorite at index {}.",
                selector
            )));
            continue;
        };

        let record = indexed
            .iter()
            .find(|df| df.record.id == id)
            .map(|df| df.record.clone());

        match store.remove_entry(&id) {
            StoreOutcome::Ok => {
                if let Some(record) = record {
                    result.add_message(CmdMessage::success(format!(
                        "Removed \"{}\" by {}.",
                        record.title, record.author
                    )));
                    removed.push(record);
                }
            }
            StoreOutcome::Rejected(RejectReason::NotFound) => {
                result.add_message(CmdMessage::warning(format!(
                    "{} is not a favorite.",
                    selector
                )));
            }
            outcome => {
                result.add_message(CmdMessage::error(format!(
                    "Could not remove {}: {}.",
                    selector, outcome
                )));
            }
        }
    }

    Ok(result.with_affected(removed))
}
