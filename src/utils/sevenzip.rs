//! 7-Zip archiver subprocess invocation

use crate::config::BackupConfig;
use crate::errors::PipelineError;
use crate::utils::executor::CommandExecutor;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Platform fallback when the binary is neither configured nor on PATH
#[cfg(unix)]
const DEFAULT_SEVENZIP: &str = "/usr/bin/7z";
#[cfg(windows)]
const DEFAULT_SEVENZIP: &str = "C:\\Program Files\\7-Zip\\7z.exe";

/// Resolve the archiver binary: explicit config path first, then PATH
/// lookup, then the platform default location
pub fn sevenzip_binary(config: &BackupConfig) -> String {
    if let Some(path) = &config.sevenzip_path {
        return path.display().to_string();
    }
    match which::which("7z") {
        Ok(path) => path.display().to_string(),
        Err(_) => DEFAULT_SEVENZIP.to_string(),
    }
}

/// Argument list for one archive invocation
pub fn build_archive_args(archive: &Path, source: &Path) -> Vec<String> {
    vec![
        "a".to_string(),
        "-r".to_string(),
        archive.display().to_string(),
        source.display().to_string(),
    ]
}

/// Compress `source` into `archive`, then remove the uncompressed source
///
/// The source is only ever removed after the archiver exits successfully;
/// a failed compression preserves it so no backup is silently lost.
pub async fn compress_file(
    executor: &dyn CommandExecutor,
    binary: &str,
    source: &Path,
    archive: &Path,
    timeout: Option<Duration>,
) -> Result<(), PipelineError> {
    let args = build_archive_args(archive, source);

    if let Err(e) = executor.run(binary, &args, timeout).await {
        return Err(PipelineError::CompressionFailed {
            path: source.to_path_buf(),
            reason: format!("{:#}", e),
        });
    }

    info!("Compressed file created: {:?}", archive);

    if let Err(e) = tokio::fs::remove_file(source).await {
        // The archive is durable at this point; a leftover dump is noise
        // that ages out through the retention sweep.
        let e = PipelineError::DeleteFailed {
            path: source.to_path_buf(),
            source: e,
        };
        warn!("Uncompressed dump left behind: {}", e);
    }

    Ok(())
}
