//! Display indexes for favorites.
//!
//! Ids are opaque 32-character strings, fine for storage and awkward to type.
//! Listings therefore number favorites `1..n` in `get_all()` order (newest
//! first) and commands accept either that number or the id itself.
//!
//! Indexes are positional: adding a favorite shifts every existing index by one.

use crate::model::FavoriteRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFavorite {
    pub index: usize,
    #[serde(flatten)]
    pub record: FavoriteRecord,
}

/// Number records in the order given, starting at 1.
pub fn index_favorites(records: Vec<FavoriteRecord>) -> Vec<DisplayFavorite> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| DisplayFavorite {
            index: i + 1,
            record,
        })
        .collect()
}

/// A user input to select a favorite, either by its display index or its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavSelector {
    Index(usize),
    Id(String),
}

impl fmt::Display for FavSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavSelector::Index(i) => write!(f, "{}", i),
            FavSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for FavSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty selector".to_string());
        }
        if s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(0) => Err("Indexes start at 1".to_string()),
                Ok(n) => Ok(FavSelector::Index(n)),
                Err(_) => Err(format!("Index out of range: {}", s)),
            };
        }
        Ok(FavSelector::Id(s.to_string()))
    }
}

impl FavSelector {
    /// The id this selector points at within `indexed`, if any.
    ///
    /// Ids are returned as given even when absent, so the store can report
    /// them as not found.
    pub fn resolve(&self, indexed: &[DisplayFavorite]) -> Option<String> {
        match self {
            FavSelector::Index(n) => indexed
                .iter()
                .find(|df| df.index == *n)
                .map(|df| df.record.id.clone()),
            FavSelector::Id(id) => Some(id.clone()),
        }
    }
}
