use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mysql_backup_manager::config::{load_config, Config};
use mysql_backup_manager::managers::backup::BackupManager;
use mysql_backup_manager::managers::logging::{init_console_logging, init_logging, LoggingConfig};
use mysql_backup_manager::managers::retention::RetentionSweeper;
use mysql_backup_manager::managers::scheduler::{Action, Scheduler};
use mysql_backup_manager::utils::archive::ArchiveStore;
use mysql_backup_manager::utils::executor::{CommandExecutor, RealExecutor};
use mysql_backup_manager::utils::locker::InstanceLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mysql-backup-manager")]
#[command(about = "Scheduled dump-and-compress backups for a MySQL database", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "/etc/mysql-backup-manager/config.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler daemon (default)
    Run,

    /// Create one backup immediately and exit
    Backup,

    /// Run one retention sweep immediately and exit
    Sweep,

    /// List files currently in the backup directory
    ListBackups,

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validate doesn't need file logging - use simple console logging
    if matches!(cli.command, Some(Commands::Validate)) {
        init_console_logging();
        return handle_validate(&cli.config);
    }

    let config = Arc::new(
        load_config(&cli.config)
            .with_context(|| format!("Failed to load config: {:?}", cli.config))?,
    );

    let logging_config = LoggingConfig::from_settings(
        &config.logging.directory,
        &config.logging.level,
        config.logging.max_files,
    );
    let _log_guard = init_logging(&logging_config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => handle_run(config).await,
        Commands::Backup => handle_backup(config).await,
        Commands::Sweep => handle_sweep(config).await,
        Commands::ListBackups => handle_list_backups(config).await,
        Commands::Validate => unreachable!(),
    }
}

/// Backup creation as a scheduled action
struct BackupAction {
    manager: Arc<BackupManager>,
}

#[async_trait]
impl Action for BackupAction {
    fn name(&self) -> &str {
        "backup"
    }

    async fn execute(&self) -> Result<()> {
        self.manager.create_backup().await?;
        Ok(())
    }
}

/// Retention sweeping as a scheduled action
struct SweepAction {
    sweeper: Arc<RetentionSweeper>,
}

#[async_trait]
impl Action for SweepAction {
    fn name(&self) -> &str {
        "sweep"
    }

    async fn execute(&self) -> Result<()> {
        self.sweeper.sweep(Utc::now()).await?;
        Ok(())
    }
}

/// Run both schedulers until the process is interrupted
async fn handle_run(config: Arc<Config>) -> Result<()> {
    let timezone = config.timezone()?;
    let executor: Arc<dyn CommandExecutor> = Arc::new(RealExecutor::new());

    let manager = Arc::new(BackupManager::new(
        Arc::clone(&config),
        timezone,
        executor,
    ));
    let sweeper = Arc::new(RetentionSweeper::new(
        manager.store().clone(),
        config.retention.max_age_days,
    ));

    // The lock file lives inside the backup directory, so the directory
    // must exist before the daemon can claim it
    manager.store().ensure().await?;
    let _instance_lock = InstanceLock::acquire(manager.store().root())?;

    let mut scheduler = Scheduler::new(timezone, config.scheduler.run_on_startup);

    let backup_lock = Arc::new(Mutex::new(()));
    let sweep_lock = if config.scheduler.serialize_actions {
        Arc::clone(&backup_lock)
    } else {
        Arc::new(Mutex::new(()))
    };

    if config.backup.enabled {
        scheduler.register(
            &config.backup.schedule,
            backup_lock,
            Arc::new(BackupAction {
                manager: Arc::clone(&manager),
            }),
        );
    } else {
        warn!("Backup schedule is disabled");
    }

    if config.retention.enabled {
        scheduler.register(
            &config.retention.schedule,
            sweep_lock,
            Arc::new(SweepAction {
                sweeper: Arc::clone(&sweeper),
            }),
        );
    } else {
        warn!("Retention sweep schedule is disabled");
    }

    info!("Backup and sweep schedulers are running. Press Ctrl+C to exit.");
    scheduler.run().await
}

/// Create a single backup outside the schedule
async fn handle_backup(config: Arc<Config>) -> Result<()> {
    let timezone = config.timezone()?;
    let executor: Arc<dyn CommandExecutor> = Arc::new(RealExecutor::new());
    let manager = BackupManager::new(Arc::clone(&config), timezone, executor);

    let artifact = manager.create_backup().await?;
    println!("Created {:?}", artifact.archive_path);
    Ok(())
}

/// Run a single retention sweep outside the schedule
async fn handle_sweep(config: Arc<Config>) -> Result<()> {
    let store = ArchiveStore::new(config.backup.directory.clone());
    let sweeper = RetentionSweeper::new(store, config.retention.max_age_days);

    let report = sweeper.sweep(Utc::now()).await?;
    println!(
        "Examined {} file(s), deleted {}, {} failed",
        report.examined,
        report.deleted.len(),
        report.failed
    );
    Ok(())
}

/// Print the archive directory inventory
async fn handle_list_backups(config: Arc<Config>) -> Result<()> {
    let store = ArchiveStore::new(config.backup.directory.clone());
    let mut entries = store.entries().await?;
    entries.sort_by_key(|e| e.modified);

    if entries.is_empty() {
        println!("No backup files in {:?}", store.root());
        return Ok(());
    }

    let now = Utc::now();
    for entry in entries {
        let modified: DateTime<Utc> = entry.modified.into();
        let age_days = (now - modified).num_days();
        let name = entry
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{:<40} {:>12} bytes  {:>4}d old", name, entry.size, age_days);
    }
    Ok(())
}

fn handle_validate(path: &Path) -> Result<()> {
    match load_config(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!(
                "  Database: {}@{}:{}/{}",
                config.database.user,
                config.database.host,
                config.database.port,
                config.database.name
            );
            println!("  Backup directory: {:?}", config.backup.directory);
            println!(
                "  Backup schedule: {} ({})",
                config.backup.schedule, config.backup.timezone
            );
            println!(
                "  Sweep schedule: {} (max age {} days)",
                config.retention.schedule, config.retention.max_age_days
            );
            Ok(())
        }
        Err(e) => anyhow::bail!("Configuration is invalid: {}", e),
    }
}
