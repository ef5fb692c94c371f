use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::identity::generate_id;
use crate::model::Book;
use crate::store::{FavoritesStore, RejectReason, StorageMedium, StoreOutcome};

pub fn run<M: StorageMedium, C: Clock>(
    store: &mut FavoritesStore<M, C>,
    book: &Book,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    match store.add_book(book) {
        StoreOutcome::Ok => {
            let id = generate_id(&book.title, &book.author);
            let added: Vec<_> = store.get_all().into_iter().filter(|r| r.id == id).collect();
            result.add_message(CmdMessage::success(format!(
                "Added \"{}\" by {} to favorites.",
                book.title, book.author
            )));
            result = result.with_affected(added);
        }
        StoreOutcome::Rejected(RejectReason::DuplicateId) => {
            result.add_message(CmdMessage::warning(format!(
                "\"{}\" by {} is already a favorite.",
                book.title, book.author
            )));
        }
        StoreOutcome::Rejected(_) => {
            result.add_message(CmdMessage::error("Both title and author are required."));
        }
        outcome @ StoreOutcome::Failed(_) => {
            result.add_message(CmdMessage::error(format!(
                "Could not add \"{}\": {}.",
                book.title, outcome
            )));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::notify::Severity;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn adds_and_reports_record() {
        let mut store = FavoritesStore::new(MemBackend::new(), ManualClock::new(10));
        let result = run(&mut store, &Book::new("活着", "余华")).unwrap();

        assert_eq!(result.affected.len(), 1);
        assert_eq!(result.affected[0].timestamp, 10);
        assert_eq!(result.messages[0].severity, Severity::Success);
    }

    #[test]
    fn duplicate_is_a_warning() {
        let mut store = FavoritesStore::new(MemBackend::new(), ManualClock::new(10));
        run(&mut store, &Book::new("T", "A")).unwrap();
        let result = run(&mut store, &Book::new("T", "A")).unwrap();

        assert!(result.affected.is_empty());
        assert_eq!(result.messages[0].severity, Severity::Warning);
    }

    #[test]
    fn invalid_and_failed_are_errors() {
        let mem = MemBackend::new();
        let mut store = FavoritesStore::new(&mem, ManualClock::new(10));
        let result = run(&mut store, &Book::new("", "A")).unwrap();
        assert_eq!(result.messages[0].severity, Severity::Error);

        mem.set_available(false);
        let result = run(&mut store, &Book::new("T", "A")).unwrap();
        assert_eq!(result.messages[0].severity, Severity::Error);
        assert!(result.messages[0].message.contains("storage unavailable"));
    }
}
