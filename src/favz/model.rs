use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A book as handed over by the recommendation layer when the user favorites it.
///
/// Only `title` and `author` are required; the rest default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Both key fields are present and non-empty.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.author.is_empty()
    }
}

/// One persisted favorite. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    /// Milliseconds since the Unix epoch at insertion.
    #[serde(default)]
    pub timestamp: i64,
}

impl FavoriteRecord {
    pub fn from_book(id: String, book: &Book, timestamp: i64) -> Self {
        Self {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            reason: book.reason.clone().unwrap_or_default(),
            category: book.category.clone().unwrap_or_default(),
            subcategory: book.subcategory.clone().unwrap_or_default(),
            timestamp,
        }
    }

    /// Builds a record out of one element of a persisted array.
    ///
    /// Returns `None` unless `id`, `title` and `author` are non-empty strings.
    /// Optional fields of the wrong type read as empty; unknown fields are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let required = |field: &str| -> Option<String> {
            match obj.get(field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            }
        };
        let optional = |field: &str| -> String {
            obj.get(field)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        Some(Self {
            id: required("id")?,
            title: required("title")?,
            author: required("author")?,
            reason: optional("reason"),
            category: optional("category"),
            subcategory: optional("subcategory"),
            timestamp: obj.get("timestamp").and_then(Value::as_i64).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_requires_title_and_author() {
        assert!(Book::new("T", "A").is_valid());
        assert!(!Book::new("", "A").is_valid());
        assert!(!Book::new("T", "").is_valid());
    }

    #[test]
    fn book_deserializes_with_missing_optionals() {
        let book: Book = serde_json::from_str(r#"{"title":"T","author":"A"}"#).unwrap();
        assert_eq!(book, Book::new("T", "A"));
    }

    #[test]
    fn record_from_book_defaults_optionals_to_empty() {
        let record = FavoriteRecord::from_book("x".into(), &Book::new("T", "A"), 42);
        assert_eq!(record.reason, "");
        assert_eq!(record.category, "");
        assert_eq!(record.subcategory, "");
        assert_eq!(record.timestamp, 42);
    }

    #[test]
    fn record_from_book_copies_optionals() {
        let book = Book::new("三体", "刘慈欣")
            .with_reason("经典")
            .with_category("科幻")
            .with_subcategory("硬科幻");
        let record = FavoriteRecord::from_book("x".into(), &book, 7);
        assert_eq!(record.reason, "经典");
        assert_eq!(record.category, "科幻");
        assert_eq!(record.subcategory, "硬科幻");
    }

    #[test]
    fn from_value_accepts_minimal_record() {
        let record = FavoriteRecord::from_value(&json!({"id": "a", "title": "T", "author": "A"}))
            .expect("valid record");
        assert_eq!(record.id, "a");
        assert_eq!(record.timestamp, 0);
    }

    #[test]
    fn from_value_rejects_missing_or_mistyped_keys() {
        assert!(FavoriteRecord::from_value(&json!({"id": "b"})).is_none());
        assert!(FavoriteRecord::from_value(&json!({"id": "", "title": "T", "author": "A"})).is_none());
        assert!(FavoriteRecord::from_value(&json!({"id": 7, "title": "T", "author": "A"})).is_none());
        assert!(FavoriteRecord::from_value(&json!("a string")).is_none());
    }

    #[test]
    fn from_value_tolerates_extra_fields_and_wrong_optionals() {
        let record = FavoriteRecord::from_value(&json!({
            "id": "a", "title": "T", "author": "A",
            "reason": 5, "category": "Art", "rating": 4, "timestamp": 1700
        }))
        .expect("valid record");
        assert_eq!(record.reason, "");
        assert_eq!(record.category, "Art");
        assert_eq!(record.timestamp, 1700);
    }
}
