//! Single-instance locking on the backup directory
//!
//! Two orchestrator processes managing the same archive directory would
//! race on file creation and deletion, so daemon mode takes an advisory
//! file lock up front and refuses to start while it is held elsewhere.

use anyhow::{Context, Result};
use fd_lock::{RwLock, RwLockWriteGuard};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const LOCK_FILE: &str = ".mysql-backup-manager.lock";

/// Lock guard held for the lifetime of the daemon
pub struct InstanceLock {
    _guard: RwLockWriteGuard<'static, File>,
    lock_path: PathBuf,
}

impl InstanceLock {
    /// Acquire the exclusive lock for a backup directory
    ///
    /// Returns an error when another process already holds it. The backing
    /// `RwLock` is leaked to give the guard a `'static` lifetime; bounded,
    /// since a process acquires at most one instance lock.
    pub fn acquire(backup_dir: &Path) -> Result<Self> {
        let lock_path = backup_dir.join(LOCK_FILE);

        debug!("Attempting to acquire instance lock: {:?}", lock_path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        let lock: &'static mut RwLock<File> = Box::leak(Box::new(RwLock::new(file)));
        let guard = lock.try_write().with_context(|| {
            format!(
                "Another instance is already managing backup directory {:?}",
                backup_dir
            )
        })?;

        info!("Acquired instance lock for {:?}", backup_dir);

        Ok(Self {
            _guard: guard,
            lock_path,
        })
    }

    /// Get the lock file path (for cleanup or inspection)
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        info!("Released instance lock: {:?}", self.lock_path);

        // Try to remove the lock file (best effort)
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            debug!("Failed to remove lock file: {}", e);
        }
    }
}
