//! Test fixtures: fake external tools and aged archive files

use anyhow::Result;
use async_trait::async_trait;
use mysql_backup_manager::utils::executor::CommandExecutor;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// A scripted stand-in for mysqldump and 7z that performs the file-system
/// side effects of the real tools: the dump writes the result file, the
/// archiver writes the archive. Failure modes skip the side effect and
/// return a non-zero-exit error, like the real tool would.
#[derive(Default)]
pub struct FakeDumpTools {
    dump_fails: bool,
    compress_fails: bool,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeDumpTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failing_dump() -> Self {
        Self {
            dump_fails: true,
            ..Self::default()
        }
    }

    pub fn with_failing_compression() -> Self {
        Self {
            compress_fails: true,
            ..Self::default()
        }
    }

    /// Program names in invocation order
    pub fn programs_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(program, _)| program.clone())
            .collect()
    }

    /// All recorded invocations with their arguments
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, program: &str, args: &[String]) {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
    }

    fn success() -> Output {
        Output {
            status: std::process::ExitStatus::default(),
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }
}

#[async_trait]
impl CommandExecutor for FakeDumpTools {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> Result<Output> {
        self.record(program, args);

        if program == "mysqldump" {
            if self.dump_fails {
                anyhow::bail!("Command failed with exit code Some(1): mysqldump: Access denied");
            }
            let dest = args
                .iter()
                .find_map(|arg| arg.strip_prefix("--result-file="))
                .expect("mysqldump invoked without --result-file");
            std::fs::write(dest, b"-- MySQL dump\nCREATE TABLE t (id INT);\n")?;
            return Ok(Self::success());
        }

        if program == "7z" {
            if self.compress_fails {
                anyhow::bail!("Command failed with exit code Some(2): 7z: cannot open archive");
            }
            // `a -r <archive> <source>`
            let archive = &args[2];
            std::fs::write(archive, b"7z-archive-bytes")?;
            return Ok(Self::success());
        }

        anyhow::bail!("Unexpected program: {}", program)
    }
}

/// Create a file whose modified time lies `age_days` before `reference`
///
/// Sweeper tests pass the same `reference` as the sweep's `now` so the
/// cutoff comparison is exact rather than racing the wall clock.
pub fn aged_file(dir: &Path, name: &str, reference: SystemTime, age_days: u64) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"backup payload").expect("Failed to write file");

    let mtime = reference - Duration::from_secs(age_days * 24 * 60 * 60);
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .expect("Failed to reopen file");
    file.set_modified(mtime).expect("Failed to set mtime");

    path
}
