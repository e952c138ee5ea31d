//! Unit tests for the backup pipeline
//!
//! These run the real pipeline against scripted stand-ins for mysqldump
//! and 7z, so the sequencing and file-system outcomes are exercised end
//! to end without a database.

use chrono::TimeZone;
use chrono_tz::Tz;
use std::sync::Arc;
use test_utils::{
    ArtifactState, BackupManager, CommandExecutor, Config, ConfigBuilder, FakeDumpTools,
    PipelineError,
};

fn kolkata() -> Tz {
    "Asia/Kolkata".parse().unwrap()
}

fn manager_with(config: Config, tools: &Arc<FakeDumpTools>) -> BackupManager {
    let executor: Arc<dyn CommandExecutor> = tools.clone();
    BackupManager::new(Arc::new(config), kolkata(), executor)
}

#[tokio::test]
async fn test_successful_run_leaves_exactly_one_archive() {
    let builder = ConfigBuilder::new();
    let backup_dir = builder.backup_dir();
    let (config, _tmp) = builder.build();

    let tools = Arc::new(FakeDumpTools::new());
    let manager = manager_with(config, &tools);

    // The directory does not exist before the first run
    assert!(!backup_dir.exists());

    let artifact = manager.create_backup().await.expect("pipeline should succeed");

    assert_eq!(artifact.state, ArtifactState::Compressed);
    assert!(artifact.archive_path.exists());
    assert!(!artifact.dump_path.exists());

    let files: Vec<_> = std::fs::read_dir(&backup_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files, vec![artifact.archive_path.clone()]);
}

#[tokio::test]
async fn test_artifact_named_for_capture_instant() {
    let builder = ConfigBuilder::new();
    let (config, _tmp) = builder.build();

    let tools = Arc::new(FakeDumpTools::new());
    let manager = manager_with(config, &tools);

    let at = kolkata().with_ymd_and_hms(2024, 3, 7, 2, 0, 5).unwrap();
    let artifact = manager
        .create_backup_at(&at)
        .await
        .expect("pipeline should succeed");

    assert_eq!(artifact.label, "backup_20240307_020005");
    assert_eq!(
        artifact.archive_path.file_name().unwrap(),
        "backup_20240307_020005.7z"
    );
}

#[tokio::test]
async fn test_failed_dump_skips_compression_and_leaves_no_files() {
    let builder = ConfigBuilder::new();
    let backup_dir = builder.backup_dir();
    let (config, _tmp) = builder.build();

    let tools = Arc::new(FakeDumpTools::with_failing_dump());
    let manager = manager_with(config, &tools);

    let err = manager.create_backup().await.unwrap_err();
    assert!(matches!(err, PipelineError::DumpFailed { .. }));

    // The archiver was never invoked
    assert!(!tools.programs_called().contains(&"7z".to_string()));

    // The directory was created but gained no files
    assert!(backup_dir.exists());
    assert_eq!(std::fs::read_dir(&backup_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_compression_preserves_dump() {
    let builder = ConfigBuilder::new();
    let backup_dir = builder.backup_dir();
    let (config, _tmp) = builder.build();

    let tools = Arc::new(FakeDumpTools::with_failing_compression());
    let manager = manager_with(config, &tools);

    let err = manager.create_backup().await.unwrap_err();
    assert!(matches!(err, PipelineError::CompressionFailed { .. }));

    let files: Vec<_> = std::fs::read_dir(&backup_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().unwrap(), "sql");
}

#[tokio::test]
async fn test_command_lines_carry_connection_and_dump_options() {
    let builder = ConfigBuilder::new();
    let (config, _tmp) = builder.build();

    let tools = Arc::new(FakeDumpTools::new());
    let manager = manager_with(config, &tools);

    manager.create_backup().await.expect("pipeline should succeed");

    let calls = tools.calls();
    assert_eq!(calls.len(), 2);

    let (dump_program, dump_args) = &calls[0];
    assert_eq!(dump_program, "mysqldump");
    assert!(dump_args.contains(&"-h".to_string()));
    assert!(dump_args.contains(&"localhost".to_string()));
    assert!(dump_args.contains(&"testdb".to_string()));
    assert!(dump_args.contains(&"--single-transaction".to_string()));
    assert!(dump_args.contains(&"--default-character-set=utf8mb4".to_string()));
    assert!(dump_args
        .last()
        .unwrap()
        .starts_with("--result-file="));

    let (archive_program, archive_args) = &calls[1];
    assert_eq!(archive_program, "7z");
    assert_eq!(archive_args[0], "a");
    assert_eq!(archive_args[1], "-r");
    assert!(archive_args[2].ends_with(".7z"));
    assert!(archive_args[3].ends_with(".sql"));
}
