use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{index_favorites, DisplayFavorite};
use crate::store::{FavoritesStore, StorageMedium};
use std::collections::{BTreeMap, HashMap};

/// Favorites grouped by category. Records keep the index they have in the flat listing.
pub fn run<M: StorageMedium, C: Clock>(store: &mut FavoritesStore<M, C>) -> Result<CmdResult> {
    let indexes: HashMap<String, usize> = index_favorites(store.get_all())
        .into_iter()
        .map(|df| (df.record.id, df.index))
        .collect();

    let mut groups: BTreeMap<String, Vec<DisplayFavorite>> = BTreeMap::new();
    for (category, records) in store.get_grouped_by_category() {
        let entries = records
            .into_iter()
            .map(|record| DisplayFavorite {
                index: indexes.get(&record.id).copied().unwrap_or(0),
                record,
            })
            .collect();
        groups.insert(category, entries);
    }

    let mut result = CmdResult::default();
    if groups.is_empty() {
        result.add_message(CmdMessage::info("No favorites yet."));
    }
    Ok(result.with_groups(groups))
}
