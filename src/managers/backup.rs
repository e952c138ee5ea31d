//! Backup pipeline - orchestrates one dump-then-compress run

use crate::config::Config;
use crate::errors::PipelineError;
use crate::utils::archive::ArchiveStore;
use crate::utils::executor::CommandExecutor;
use crate::utils::{mysqldump, sevenzip};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Lifecycle of one backup attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Dumping,
    Dumped,
    Compressing,
    Compressed,
    Failed,
}

/// One backup attempt: a timestamp label and the two files derived from it
///
/// Owned by the pipeline invocation that created it; the compressed file
/// outlives it on disk.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    pub label: String,
    pub dump_path: PathBuf,
    pub archive_path: PathBuf,
    pub state: ArtifactState,
}

impl BackupArtifact {
    fn new(store: &ArchiveStore, label: String) -> Self {
        let dump_path = store.dump_path(&label);
        let archive_path = store.archive_path(&label);
        Self {
            label,
            dump_path,
            archive_path,
            state: ArtifactState::Dumping,
        }
    }
}

/// Composes the dump invoker and the compressor into one "create backup"
/// operation
pub struct BackupManager {
    config: Arc<Config>,
    store: ArchiveStore,
    executor: Arc<dyn CommandExecutor>,
    timezone: Tz,
    dump_binary: String,
    sevenzip_binary: String,
}

impl BackupManager {
    pub fn new(config: Arc<Config>, timezone: Tz, executor: Arc<dyn CommandExecutor>) -> Self {
        let store = ArchiveStore::new(config.backup.directory.clone());
        let dump_binary = mysqldump::dump_binary(&config.backup);
        let sevenzip_binary = sevenzip::sevenzip_binary(&config.backup);

        Self {
            config,
            store,
            executor,
            timezone,
            dump_binary,
            sevenzip_binary,
        }
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    fn timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.config.backup.timeout_seconds))
    }

    /// Produce exactly one durable compressed backup
    pub async fn create_backup(&self) -> Result<BackupArtifact, PipelineError> {
        let now = Utc::now().with_timezone(&self.timezone);
        self.create_backup_at(&now).await
    }

    /// Pipeline body with the capture instant supplied by the caller
    pub async fn create_backup_at(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<BackupArtifact, PipelineError> {
        let label = ArchiveStore::timestamp_label(now);
        let mut artifact = BackupArtifact::new(&self.store, label);

        info!("Starting backup run: {}", artifact.label);

        match self.run_pipeline(&mut artifact).await {
            Ok(()) => {
                info!("Backup run complete: {:?}", artifact.archive_path);
                Ok(artifact)
            }
            Err(e) => {
                artifact.state = ArtifactState::Failed;
                error!("Backup run '{}' failed: {}", artifact.label, e);
                Err(e)
            }
        }
    }

    /// Dump strictly precedes compression, which strictly precedes removal
    /// of the uncompressed source (the compressor's own contract). A
    /// failure at any stage aborts the remaining stages; the next
    /// scheduled tick is the retry mechanism.
    async fn run_pipeline(&self, artifact: &mut BackupArtifact) -> Result<(), PipelineError> {
        self.store.ensure().await?;

        debug!(
            "Dumping database '{}' to {:?}",
            self.config.database.name, artifact.dump_path
        );
        mysqldump::dump_database(
            self.executor.as_ref(),
            &self.dump_binary,
            &self.config.database,
            &artifact.dump_path,
            self.timeout(),
        )
        .await?;
        artifact.state = ArtifactState::Dumped;

        artifact.state = ArtifactState::Compressing;
        debug!(
            "Compressing {:?} to {:?}",
            artifact.dump_path, artifact.archive_path
        );
        sevenzip::compress_file(
            self.executor.as_ref(),
            &self.sevenzip_binary,
            &artifact.dump_path,
            &artifact.archive_path,
            self.timeout(),
        )
        .await?;
        artifact.state = ArtifactState::Compressed;

        Ok(())
    }
}
