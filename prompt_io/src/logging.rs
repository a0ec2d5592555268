//! Logging bootstrap for the console binaries.
//!
//! Logs go to stderr unless a log directory is given, in which case they are
//! written to size-rotated files there so they do not interleave with prompts.

use anyhow::{Result, bail};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use std::path::{Path, PathBuf};

const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Level used when the user does not pass one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Start the global logger.
///
/// The returned handle must be kept alive for as long as logging is needed.
///
/// # Errors
/// - `level` is not one of trace|debug|info|warn|error.
/// - `log_dir` is relative or cannot be created.
/// - The logger backend fails to start (for example, when called twice).
pub fn init_logging(level: &str, log_dir: Option<&Path>, basename: &str) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    let logger = Logger::try_with_str(level)
        .map_err(|err| anyhow::anyhow!("invalid log level `{level}`: {err}"))?;

    let logger = match log_dir {
        Some(dir) => {
            let dir = normalize_log_dir(dir)?;
            std::fs::create_dir_all(&dir).map_err(|err| {
                anyhow::anyhow!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(basename))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger,
    };

    let handle = logger
        .start()
        .map_err(|err| anyhow::anyhow!("failed to start logger: {err}"))?;

    info!(
        "event=app_start program={} level={} version={}",
        basename,
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => bail!("unsupported log level `{other}`; expected trace|debug|info|warn|error"),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf> {
    if log_dir.as_os_str().is_empty() {
        bail!("log directory cannot be empty");
    }
    if !log_dir.is_absolute() {
        bail!(
            "log directory must be an absolute path, got `{}`",
            log_dir.display()
        );
    }
    Ok(log_dir.to_path_buf())
}
