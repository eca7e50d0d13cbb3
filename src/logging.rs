//! File logging for the running experience.
//!
//! The TUI owns the terminal, so nothing is ever written to stdout or
//! stderr while it runs. Events go to a daily-rotated file instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Prefix of the rotated log files, e.g. `snowcard.2025-12-25`.
pub const LOG_PREFIX: &str = "snowcard";

/// Default log directory: `<data_local_dir>/snowcard/logs`.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snowcard")
        .join("logs")
}

/// Filter directive for the chosen verbosity.
pub fn filter_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Install the global subscriber writing to `log_dir`.
///
/// The returned guard flushes pending lines on drop; hold it until exit.
pub fn setup_logging(log_dir: &Path, debug: bool) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = rolling::daily(log_dir, LOG_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let level = filter_directive(debug);
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .try_init()
        .context("logging was already initialised")?;

    tracing::info!(dir = %log_dir.display(), level, "logging initialized");

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn debug_flag_picks_level() {
        assert_eq!(filter_directive(false), "info");
        assert_eq!(filter_directive(true), "debug");
    }

    #[test]
    fn default_dir_ends_in_logs() {
        let dir = default_log_dir();
        assert!(dir.ends_with("snowcard/logs"));
    }

    #[test]
    fn setup_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("nested").join("logs");

        // A second global subscriber in the same test binary is an error,
        // but the directory is created before that point either way.
        let _guard = setup_logging(&log_dir, false);

        assert!(log_dir.is_dir());
    }
}
