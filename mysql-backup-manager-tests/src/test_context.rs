//! Shared scratch-directory context for tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Owns a temporary directory for one test
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Conventional backup directory inside the scratch space (not created)
    pub fn backup_dir(&self) -> PathBuf {
        self.temp_dir.path().join("backups")
    }

    /// Backup directory, created
    pub fn created_backup_dir(&self) -> PathBuf {
        let dir = self.backup_dir();
        std::fs::create_dir_all(&dir).expect("Failed to create backup dir");
        dir
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
