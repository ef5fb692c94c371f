use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::index_favorites;
use crate::store::{FavoritesStore, StorageMedium};

pub fn run<M: StorageMedium, C: Clock>(store: &mut FavoritesStore<M, C>) -> Result<CmdResult> {
    let listed = index_favorites(store.get_all());
    let mut result = CmdResult::default();
    if listed.is_empty() {
        result.add_message(CmdMessage::info("No favorites yet."));
    }
    Ok(result.with_listed(listed))
}
