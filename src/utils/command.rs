//! Utilities for running external commands with proper error handling and timeouts

use anyhow::{Context, Result};
use std::process::{Output, Stdio};
use std::time::Duration;
use tracing::{debug, error};

/// Run a command with an optional timeout
///
/// Fails on spawn errors, timeouts, and non-zero exit codes; the failure
/// message carries the process stderr. On success the full `Output` is
/// returned so callers can inspect stderr for nonfatal warnings.
pub async fn run_command(
    program: &str,
    args: &[String],
    timeout: Option<Duration>,
) -> Result<Output> {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!("Running command: {} {}", program, redact_args(args).join(" "));

    let output = if let Some(timeout_duration) = timeout {
        match tokio::time::timeout(timeout_duration, cmd.output()).await {
            Ok(output) => output.context(format!("Failed to execute {}", program))?,
            Err(_) => anyhow::bail!(
                "Command timed out after {:?}: {}",
                timeout_duration,
                program
            ),
        }
    } else {
        cmd.output()
            .await
            .context(format!("Failed to execute {}", program))?
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(
            "Command failed: {} {}",
            program,
            redact_args(args).join(" ")
        );
        error!("Stderr: {}", stderr);
        anyhow::bail!(
            "Command failed with exit code {:?}: {}",
            output.status.code(),
            stderr.trim()
        );
    }

    Ok(output)
}

/// Mask credential-bearing arguments before they reach a log line
pub fn redact_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            if arg.starts_with("--password=") {
                "--password=***".to_string()
            } else {
                arg.clone()
            }
        })
        .collect()
}
