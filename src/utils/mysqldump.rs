//! mysqldump subprocess invocation

use crate::config::{BackupConfig, DatabaseConfig};
use crate::errors::PipelineError;
use crate::utils::executor::CommandExecutor;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Resolve the dump binary: explicit config path first, then PATH lookup,
/// then the bare name (a missing binary then surfaces as a spawn failure)
pub fn dump_binary(config: &BackupConfig) -> String {
    if let Some(path) = &config.mysqldump_path {
        return path.display().to_string();
    }
    match which::which("mysqldump") {
        Ok(path) => path.display().to_string(),
        Err(_) => "mysqldump".to_string(),
    }
}

/// Argument list for one dump invocation
pub fn build_dump_args(db: &DatabaseConfig, dest: &Path) -> Vec<String> {
    let mut args = vec![
        "-h".to_string(),
        db.host.clone(),
        "-P".to_string(),
        db.port.to_string(),
        "-u".to_string(),
        db.user.clone(),
        format!("--password={}", db.password),
        db.name.clone(),
    ];

    let opts = &db.dump_options;
    if opts.routines {
        args.push("--routines".to_string());
    }
    if opts.triggers {
        args.push("--triggers".to_string());
    }
    if opts.events {
        args.push("--events".to_string());
    }
    if opts.single_transaction {
        args.push("--single-transaction".to_string());
    }
    if opts.quick {
        args.push("--quick".to_string());
    }
    args.push(format!("--default-character-set={}", opts.charset));
    args.push(format!("--result-file={}", dest.display()));
    args
}

/// Run the external dump process, writing the export to `dest`
///
/// A failed run removes whatever partial output file exists, so the backup
/// directory never gains a file from an unsuccessful dump.
pub async fn dump_database(
    executor: &dyn CommandExecutor,
    binary: &str,
    db: &DatabaseConfig,
    dest: &Path,
    timeout: Option<Duration>,
) -> Result<(), PipelineError> {
    let args = build_dump_args(db, dest);

    let output = match executor.run(binary, &args, timeout).await {
        Ok(output) => output,
        Err(e) => {
            remove_partial(dest).await;
            return Err(PipelineError::DumpFailed {
                reason: format!("{:#}", e),
            });
        }
    };

    // mysqldump writes warnings to stderr even when it exits zero
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        warn!("mysqldump stderr: {}", stderr.trim());
    }

    match tokio::fs::metadata(dest).await {
        Ok(meta) if meta.len() > 0 => {
            info!("Backup file created: {:?}", dest);
            Ok(())
        }
        Ok(_) => {
            remove_partial(dest).await;
            Err(PipelineError::DumpFailed {
                reason: format!("dump produced an empty file: {:?}", dest),
            })
        }
        Err(e) => Err(PipelineError::DumpFailed {
            reason: format!("dump produced no output file: {}", e),
        }),
    }
}

async fn remove_partial(dest: &Path) {
    match tokio::fs::remove_file(dest).await {
        Ok(()) => warn!("Removed partial dump file: {:?}", dest),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial dump file {:?}: {}", dest, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, DumpOptions};
    use std::path::PathBuf;

    fn sample_db() -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".to_string(),
            port: 3306,
            user: "backup".to_string(),
            password: "secret".to_string(),
            name: "inventory".to_string(),
            dump_options: DumpOptions::default(),
        }
    }

    #[test]
    fn test_build_dump_args_defaults() {
        let dest = PathBuf::from("/var/backups/db/backup_20240307_020005.sql");
        let args = build_dump_args(&sample_db(), &dest);

        assert_eq!(args[0], "-h");
        assert_eq!(args[1], "db.internal");
        assert!(args.contains(&"--password=secret".to_string()));
        assert!(args.contains(&"inventory".to_string()));
        assert!(args.contains(&"--routines".to_string()));
        assert!(args.contains(&"--triggers".to_string()));
        assert!(args.contains(&"--events".to_string()));
        assert!(args.contains(&"--single-transaction".to_string()));
        assert!(args.contains(&"--quick".to_string()));
        assert!(args.contains(&"--default-character-set=utf8mb4".to_string()));
        assert_eq!(
            args.last().unwrap(),
            "--result-file=/var/backups/db/backup_20240307_020005.sql"
        );
    }

    #[test]
    fn test_build_dump_args_respects_disabled_options() {
        let mut db = sample_db();
        db.dump_options.routines = false;
        db.dump_options.single_transaction = false;

        let args = build_dump_args(&db, &PathBuf::from("/tmp/out.sql"));
        assert!(!args.contains(&"--routines".to_string()));
        assert!(!args.contains(&"--single-transaction".to_string()));
        assert!(args.contains(&"--triggers".to_string()));
    }
}
