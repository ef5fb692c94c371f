//! Category views over an already ordered list of favorites.
//!
//! Nothing here is cached. Callers pass the output of `get_all()` and get a
//! fresh projection; bucket contents keep the order they were given in.

use crate::model::FavoriteRecord;
use std::collections::BTreeMap;

/// Bucket for records with an empty category.
pub const OTHER_CATEGORY: &str = "其他";

/// Category name → records, keys in ascending lexicographic order.
pub type GroupedFavorites = BTreeMap<String, Vec<FavoriteRecord>>;

pub fn group_by_category(records: &[FavoriteRecord], other_label: &str) -> GroupedFavorites {
    let mut groups = GroupedFavorites::new();
    for record in records {
        groups
            .entry(bucket_name(record, other_label).to_string())
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Category name → number of records, same key order as [`group_by_category`].
pub fn category_counts(records: &[FavoriteRecord], other_label: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts
            .entry(bucket_name(record, other_label).to_string())
            .or_insert(0) += 1;
    }
    counts
}

fn bucket_name<'a>(record: &'a FavoriteRecord, other_label: &'a str) -> &'a str {
    if record.category.is_empty() {
        other_label
    } else {
        &record.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str, timestamp: i64) -> FavoriteRecord {
        FavoriteRecord {
            id: id.to_string(),
            title: format!("Title {}", id),
            author: "Author".to_string(),
            reason: String::new(),
            category: category.to_string(),
            subcategory: String::new(),
            timestamp,
        }
    }

    #[test]
    fn groups_sorted_by_key_and_keep_input_order() {
        let records = vec![
            record("f2", "Fiction", 300),
            record("a1", "Art", 200),
            record("f1", "Fiction", 100),
        ];
        let grouped = group_by_category(&records, OTHER_CATEGORY);

        let keys: Vec<&str> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Art", "Fiction"]);

        let fiction: Vec<&str> = grouped["Fiction"].iter().map(|r| r.id.as_str()).collect();
        assert_eq!(fiction, vec!["f2", "f1"]);
    }

    #[test]
    fn empty_category_goes_to_other_bucket() {
        let records = vec![record("x", "", 1), record("y", "Art", 2)];
        let grouped = group_by_category(&records, OTHER_CATEGORY);
        assert_eq!(grouped[OTHER_CATEGORY].len(), 1);
        assert_eq!(grouped[OTHER_CATEGORY][0].id, "x");
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(group_by_category(&[], OTHER_CATEGORY).is_empty());
    }

    #[test]
    fn counts_match_groups() {
        let records = vec![
            record("a", "文学类", 1),
            record("b", "文学类", 2),
            record("c", "", 3),
        ];
        let counts = category_counts(&records, "Other");
        assert_eq!(counts.get("文学类"), Some(&2));
        assert_eq!(counts.get("Other"), Some(&1));
        assert_eq!(
            counts.keys().collect::<Vec<_>>(),
            group_by_category(&records, "Other").keys().collect::<Vec<_>>()
        );
    }
}
