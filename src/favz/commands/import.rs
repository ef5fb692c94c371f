use crate::clock::Clock;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{FavzError, Result};
use crate::model::Book;
use crate::store::{FavoritesStore, RejectReason, StorageMedium, StoreOutcome};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted file shapes: a bare array of books, or a recommendation
/// response carrying them under `recommendations`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Books(Vec<Book>),
    Recommendations { recommendations: Vec<Book> },
}

impl ImportPayload {
    fn into_books(self) -> Vec<Book> {
        match self {
            ImportPayload::Books(books) => books,
            ImportPayload::Recommendations { recommendations } => recommendations,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportTally {
    pub added: usize,
    pub duplicate: usize,
    pub invalid: usize,
    pub failed: usize,
}

pub fn run<M: StorageMedium, C: Clock>(
    store: &mut FavoritesStore<M, C>,
    paths: Vec<PathBuf>,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut tally = ImportTally::default();
    let mut added = Vec::new();

    for path in paths {
        if !path.is_file() {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
            continue;
        }

        let books = match read_books(&path) {
            Ok(books) => books,
            Err(e) => {
                result.add_message(CmdMessage::warning(format!(
                    "Failed to import {}: {}",
                    path.display(),
                    e
                )));
                continue;
            }
        };

        for book in &books {
            match store.add_book(book) {
                StoreOutcome::Ok => {
                    tally.added += 1;
                    added.push(book.clone());
                }
                StoreOutcome::Rejected(RejectReason::DuplicateId) => tally.duplicate += 1,
                StoreOutcome::Rejected(_) => tally.invalid += 1,
                StoreOutcome::Failed(_) => tally.failed += 1,
            }
        }
        result.add_message(CmdMessage::info(format!(
            "Read {} book(s) from {}",
            books.len(),
            path.display()
        )));
    }

    let records = store
        .get_all()
        .into_iter()
        .filter(|r| added.iter().any(|b| b.title == r.title && b.author == r.author))
        .collect();

    result.add_message(summary(&tally));
    Ok(result.with_affected(records))
}

fn read_books(path: &Path) -> Result<Vec<Book>> {
    let content = fs::read_to_string(path).map_err(FavzError::Io)?;
    let payload: ImportPayload =
        serde_json::from_str(&content).map_err(FavzError::Serialization)?;
    Ok(payload.into_books())
}

fn summary(tally: &ImportTally) -> CmdMessage {
    let text = format!(
        "Imported {} favorite(s): {} already present, {} invalid, {} failed",
        tally.added, tally.duplicate, tally.invalid, tally.failed
    );
    if tally.failed > 0 {
        CmdMessage::error(text)
    } else {
        CmdMessage::success(text)
    }
}
