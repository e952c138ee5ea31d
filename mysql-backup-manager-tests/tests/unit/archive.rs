//! Unit tests for the archive store

use test_utils::{ArchiveStore, PipelineError, TestContext};

#[tokio::test]
async fn test_ensure_creates_directory_recursively() {
    let ctx = TestContext::new();
    let nested = ctx.path().join("var").join("backups").join("db");
    let store = ArchiveStore::new(nested.clone());

    assert!(!nested.exists());
    store.ensure().await.expect("ensure should create the directory");
    assert!(nested.is_dir());

    // Idempotent when the directory already exists
    store.ensure().await.expect("ensure should be idempotent");
}

#[tokio::test]
async fn test_entries_lists_only_regular_files() {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();

    std::fs::write(dir.join("backup_20240101_020000.7z"), b"abcd").unwrap();
    std::fs::write(dir.join("backup_20240102_020000.sql"), b"ab").unwrap();
    std::fs::create_dir(dir.join("not-an-artifact")).unwrap();

    let store = ArchiveStore::new(dir);
    let mut entries = store.entries().await.expect("listing should succeed");
    entries.sort_by_key(|e| e.path.clone());

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].size, 4);
    assert_eq!(entries[1].size, 2);
}

#[tokio::test]
async fn test_remove_deletes_entry() {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();
    let file = dir.join("backup_20240101_020000.7z");
    std::fs::write(&file, b"abcd").unwrap();

    let store = ArchiveStore::new(dir);
    store.remove(&file).await.expect("remove should succeed");
    assert!(!file.exists());
}

#[tokio::test]
async fn test_entries_fails_on_missing_directory() {
    let ctx = TestContext::new();
    let store = ArchiveStore::new(ctx.backup_dir());

    let err = store.entries().await.unwrap_err();
    assert!(matches!(err, PipelineError::DirectoryAccessFailed { .. }));
}
