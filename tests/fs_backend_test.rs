use favz::clock::ManualClock;
use favz::error::FavzError;
use favz::model::Book;
use favz::store::fs_backend::FsBackend;
use favz::store::{FailReason, FavoritesStore, LoadOutcome, StorageMedium, StoreOutcome};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("storage"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_item_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.get_item("greeting").unwrap(), None);

    backend.set_item("greeting", "Hello World").unwrap();
    assert_eq!(
        backend.get_item("greeting").unwrap(),
        Some("Hello World".to_string())
    );

    backend.remove_item("greeting").unwrap();
    assert_eq!(backend.get_item("greeting").unwrap(), None);

    // Removing twice is fine
    backend.remove_item("greeting").unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();

    backend.set_item("bookFavorites", "[]").unwrap();
    backend.set_item("bookFavorites", "[1]").unwrap();

    let on_disk = fs::read_to_string(backend.root().join("bookFavorites")).unwrap();
    assert_eq!(on_disk, "[1]");

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_keys_skip_hidden_files() {
    let (_dir, backend) = setup();
    backend.set_item("a", "1").unwrap();
    backend.set_item("b_backup_5", "2").unwrap();
    fs::write(backend.root().join(".scratch"), "x").unwrap();

    let mut keys = backend.keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b_backup_5".to_string()]);
}

#[test]
fn test_fs_backend_rejects_unsafe_keys() {
    let (_dir, backend) = setup();
    for key in ["", ".hidden", "../escape", "a/b", "spaced key"] {
        assert!(
            matches!(backend.set_item(key, "x"), Err(FavzError::InvalidKey(_))),
            "accepted {:?}",
            key
        );
    }
}

#[test]
fn test_fs_backend_quota() {
    let (_dir, backend) = setup();
    let backend = backend.with_quota(20);

    backend.set_item("k", "0123456789").unwrap();
    // Replacing an entry only counts the new size
    backend.set_item("k", "9876543210").unwrap();

    let err = backend.set_item("other", "0123456789").unwrap_err();
    assert!(err.is_quota_exceeded());
    assert_eq!(backend.get_item("other").unwrap(), None);
}

#[test]
fn test_fs_backend_keys_on_missing_root() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("never-created"));
    assert!(backend.keys().unwrap().is_empty());
    assert_eq!(backend.get_item("anything").unwrap(), None);
}

#[test]
fn test_store_persists_across_instances() {
    let (dir, backend) = setup();
    let mut store = FavoritesStore::new(backend, ManualClock::new(1_000));
    assert!(store.add(&Book::new("活着", "余华").with_category("文学")));

    let reopened = FsBackend::new(dir.path().join("storage"));
    let mut store = FavoritesStore::new(reopened, ManualClock::new(2_000));
    let all = store.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "活着");
    assert_eq!(all[0].timestamp, 1_000);
}

#[test]
fn test_store_quarantines_corrupt_file() {
    let (dir, backend) = setup();
    backend.set_item("bookFavorites", "{\"not\": \"a list\"}").unwrap();

    let mut store = FavoritesStore::new(backend, ManualClock::new(77));
    assert!(store.get_all().is_empty());
    assert_eq!(
        store.last_report().map(|r| r.outcome),
        Some(LoadOutcome::Quarantined)
    );

    let storage = dir.path().join("storage");
    assert_eq!(
        fs::read_to_string(storage.join("bookFavorites_backup_77")).unwrap(),
        "{\"not\": \"a list\"}"
    );
    assert_eq!(fs::read_to_string(storage.join("bookFavorites")).unwrap(), "[]");
    assert_eq!(store.quarantine_keys(), vec!["bookFavorites_backup_77".to_string()]);
}

#[test]
fn test_store_reports_quota_failures() {
    let (_dir, backend) = setup();
    let mut store = FavoritesStore::new(backend.with_quota(200), ManualClock::new(1));

    let long_reason = "x".repeat(500);
    let outcome = store.add_book(&Book::new("T", "A").with_reason(long_reason));
    assert_eq!(outcome, StoreOutcome::Failed(FailReason::QuotaExceeded));
    assert!(store.get_all().is_empty());
}

#[test]
fn test_fs_backend_ignores_foreign_files() {
    let (_dir, backend) = setup();
    let backend = backend.with_quota(5 * 1024 * 1024);
    backend.set_item("bookFavorites", "[]").unwrap();
    fs::write(
        backend.root().join("bookFavorites (conflicted copy)"),
        "[\"stale\"]",
    )
    .unwrap();

    assert_eq!(backend.keys().unwrap(), vec!["bookFavorites".to_string()]);
    backend.set_item("other", "1").unwrap();
}

#[test]
fn test_store_survives_sync_conflict_copies() {
    let (dir, backend) = setup();
    let quota = 5 * 1024 * 1024;
    let mut store = FavoritesStore::new(backend.with_quota(quota), ManualClock::new(1));
    assert!(store.add(&Book::new("活着", "余华")));

    let storage = dir.path().join("storage");
    fs::write(storage.join("bookFavorites (conflicted copy)"), "[]").unwrap();

    let reopened = FsBackend::new(&storage).with_quota(quota);
    let mut store = FavoritesStore::new(reopened, ManualClock::new(2));
    assert_eq!(store.get_all().len(), 1);
    assert_eq!(
        store.last_report().map(|r| r.outcome),
        Some(LoadOutcome::Clean)
    );
    assert!(store.add(&Book::new("Dune", "Herbert")));
    assert!(storage.join("bookFavorites (conflicted copy)").exists());
}
