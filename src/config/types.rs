use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub backup: BackupConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection parameters for the database being backed up
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub user: String,

    pub password: String,

    /// Database name to dump
    pub name: String,

    #[serde(default)]
    pub dump_options: DumpOptions,
}

/// Options forwarded to the dump tool
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DumpOptions {
    /// Include stored routines, triggers, and scheduled events
    #[serde(default = "default_true")]
    pub routines: bool,
    #[serde(default = "default_true")]
    pub triggers: bool,
    #[serde(default = "default_true")]
    pub events: bool,

    /// Dump inside a single transaction for a consistent snapshot
    #[serde(default = "default_true")]
    pub single_transaction: bool,

    /// Fetch rows one at a time instead of buffering whole tables
    #[serde(default = "default_true")]
    pub quick: bool,

    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            routines: true,
            triggers: true,
            events: true,
            single_transaction: true,
            quick: true,
            charset: default_charset(),
        }
    }
}

/// Backup creation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Directory that receives dump and archive files
    pub directory: PathBuf,

    /// Cron schedule for backup creation (5 fields)
    #[serde(default = "default_backup_schedule")]
    pub schedule: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Timezone used for both artifact timestamps and schedule evaluation
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Explicit path to the mysqldump binary (PATH lookup otherwise)
    #[serde(default)]
    pub mysqldump_path: Option<PathBuf>,

    /// Explicit path to the 7z binary (PATH lookup otherwise)
    #[serde(default)]
    pub sevenzip_path: Option<PathBuf>,

    /// Timeout for each external process
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Age-based retention settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Files modified longer ago than this are deleted by the sweep
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,

    /// Cron schedule for the retention sweep (5 fields)
    #[serde(default = "default_sweep_schedule")]
    pub schedule: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
            schedule: default_sweep_schedule(),
            enabled: true,
        }
    }
}

/// Scheduler behavior settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Run each enabled action once at startup, before the first tick
    #[serde(default = "default_enabled")]
    pub run_on_startup: bool,

    /// Make backup and sweep mutually exclusive across actions, not just
    /// within one action
    #[serde(default)]
    pub serialize_actions: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            run_on_startup: true,
            serialize_actions: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_max_files")]
    pub max_files: u32,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            level: default_log_level(),
            max_files: default_log_max_files(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    3306
}
fn default_true() -> bool {
    true
}
fn default_charset() -> String {
    "utf8mb4".to_string()
}
fn default_backup_schedule() -> String {
    "0 2 * * *".to_string()
}
fn default_sweep_schedule() -> String {
    "0 3 * * *".to_string()
}
fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}
fn default_timeout() -> u64 {
    3600
}
fn default_max_age_days() -> u32 {
    3
}
fn default_enabled() -> bool {
    true
}
fn default_log_directory() -> PathBuf {
    PathBuf::from("~/logs")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_max_files() -> u32 {
    10
}
