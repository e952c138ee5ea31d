//! Unit tests for the retention sweeper

use chrono::{DateTime, Utc};
use rstest::rstest;
use std::time::SystemTime;
use test_utils::{aged_file, ArchiveStore, PipelineError, RetentionSweeper, TestContext};

fn sweeper_for(dir: std::path::PathBuf, max_age_days: u32) -> RetentionSweeper {
    RetentionSweeper::new(ArchiveStore::new(dir), max_age_days)
}

#[tokio::test]
async fn test_sweep_deletes_only_entries_past_cutoff() {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();
    let reference = SystemTime::now();

    for age in 1..=5u64 {
        aged_file(
            &dir,
            &format!("backup_2024010{}_020000.7z", age),
            reference,
            age,
        );
    }

    let sweeper = sweeper_for(dir.clone(), 3);
    let report = sweeper
        .sweep(DateTime::<Utc>::from(reference))
        .await
        .expect("sweep should succeed");

    assert_eq!(report.examined, 5);
    assert_eq!(report.deleted.len(), 2);
    assert_eq!(report.failed, 0);

    let mut remaining: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    remaining.sort();
    assert_eq!(
        remaining,
        vec![
            "backup_20240101_020000.7z",
            "backup_20240102_020000.7z",
            "backup_20240103_020000.7z",
        ]
    );
}

#[rstest]
#[case::newer_than_cutoff(2, false)]
#[case::at_cutoff(3, false)]
#[case::older_than_cutoff(4, true)]
#[tokio::test]
async fn test_cutoff_boundary(#[case] age_days: u64, #[case] expect_deleted: bool) {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();
    let reference = SystemTime::now();

    let file = aged_file(&dir, "backup_20240101_020000.7z", reference, age_days);

    let sweeper = sweeper_for(dir, 3);
    let report = sweeper
        .sweep(DateTime::<Utc>::from(reference))
        .await
        .expect("sweep should succeed");

    assert_eq!(report.deleted.len(), usize::from(expect_deleted));
    assert_eq!(file.exists(), !expect_deleted);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();
    let reference = SystemTime::now();

    aged_file(&dir, "backup_20240101_020000.7z", reference, 5);
    aged_file(&dir, "backup_20240104_020000.7z", reference, 1);

    let sweeper = sweeper_for(dir, 3);
    let now = DateTime::<Utc>::from(reference);

    let first = sweeper.sweep(now).await.expect("first sweep");
    assert_eq!(first.deleted.len(), 1);

    let second = sweeper.sweep(now).await.expect("second sweep");
    assert_eq!(second.deleted.len(), 0);
    assert_eq!(second.examined, 1);
}

#[tokio::test]
async fn test_age_is_the_sole_criterion() {
    let ctx = TestContext::new();
    let dir = ctx.created_backup_dir();
    let reference = SystemTime::now();

    // An old file that doesn't look like a backup is still swept, and a
    // fresh dump is kept regardless of extension
    let old_stray = aged_file(&dir, "notes.txt", reference, 10);
    let fresh_dump = aged_file(&dir, "backup_20240107_020000.sql", reference, 0);

    let sweeper = sweeper_for(dir, 3);
    sweeper
        .sweep(DateTime::<Utc>::from(reference))
        .await
        .expect("sweep should succeed");

    assert!(!old_stray.exists());
    assert!(fresh_dump.exists());
}

#[tokio::test]
async fn test_sweep_fails_on_missing_directory() {
    let ctx = TestContext::new();
    let sweeper = sweeper_for(ctx.backup_dir(), 3);

    let err = sweeper.sweep(Utc::now()).await.unwrap_err();
    assert!(matches!(err, PipelineError::DirectoryAccessFailed { .. }));
}
