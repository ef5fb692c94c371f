use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::identity::generate_id;
use crate::store::{FavoritesStore, StorageMedium};

pub fn run<M: StorageMedium, C: Clock>(
    store: &mut FavoritesStore<M, C>,
    title: &str,
    author: &str,
) -> Result<CmdResult> {
    let id = generate_id(title, author);
    let found = store.is_favorite(&id);

    let mut result = CmdResult::default();
    result.is_favorite = Some(found);
    if found {
        result.add_message(CmdMessage::success(format!(
            "\"{}\" by {} is a favorite ({}).",
            title, author, id
        )));
    } else {
        result.add_message(CmdMessage::info(format!(
            "\"{}\" by {} is not a favorite.",
            title, author
        )));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::Book;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn reports_membership() {
        let mut store = FavoritesStore::new(MemBackend::new(), ManualClock::new(1));
        store.add(&Book::new("T", "A"));

        assert_eq!(run(&mut store, "T", "A").unwrap().is_favorite, Some(true));
        assert_eq!(run(&mut store, "T", "B").unwrap().is_favorite, Some(false));
    }
}
