//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with
//! sensible defaults. The backup directory is NOT created up front so
//! tests can observe the pipeline creating it.

use mysql_backup_manager::config::{
    BackupConfig, Config, DatabaseConfig, DumpOptions, LoggingSettings, RetentionConfig,
    SchedulerConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct ConfigBuilder {
    temp_dir: TempDir,
    config: Config,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with minimal defaults
    ///
    /// Tool paths are pinned to bare names so no PATH lookup happens and
    /// fake executors can match on them exactly.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backup_dir = temp_dir.path().join("backups");
        let log_dir = temp_dir.path().join("logs");

        let config = Config {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                user: "backup".to_string(),
                password: "secret".to_string(),
                name: "testdb".to_string(),
                dump_options: DumpOptions::default(),
            },
            backup: BackupConfig {
                directory: backup_dir,
                schedule: "0 2 * * *".to_string(),
                enabled: true,
                timezone: "Asia/Kolkata".to_string(),
                mysqldump_path: Some(PathBuf::from("mysqldump")),
                sevenzip_path: Some(PathBuf::from("7z")),
                timeout_seconds: 60,
            },
            retention: RetentionConfig {
                max_age_days: 3,
                schedule: "0 3 * * *".to_string(),
                enabled: true,
            },
            scheduler: SchedulerConfig::default(),
            logging: LoggingSettings {
                directory: log_dir,
                level: "debug".to_string(),
                max_files: 3,
            },
        };

        Self { temp_dir, config }
    }

    /// The backup directory this configuration points at
    pub fn backup_dir(&self) -> PathBuf {
        self.config.backup.directory.clone()
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.config.retention.max_age_days = days;
        self
    }

    pub fn with_backup_schedule(mut self, expression: &str) -> Self {
        self.config.backup.schedule = expression.to_string();
        self
    }

    pub fn with_sweep_schedule(mut self, expression: &str) -> Self {
        self.config.retention.schedule = expression.to_string();
        self
    }

    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.config.backup.timezone = timezone.to_string();
        self
    }

    pub fn with_serialized_actions(mut self) -> Self {
        self.config.scheduler.serialize_actions = true;
        self
    }

    /// Consume the builder, keeping the TempDir alive alongside the config
    pub fn build(self) -> (Config, TempDir) {
        (self.config, self.temp_dir)
    }

    /// Serialize the configuration to a TOML file inside the temp dir and
    /// return its path (for exercising the loader end to end)
    pub fn write_toml(&self) -> PathBuf {
        let path = self.temp_dir.path().join("config.toml");
        let contents = toml::to_string(&self.config).expect("Failed to serialize config");
        fs::write(&path, contents).expect("Failed to write config file");
        path
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
