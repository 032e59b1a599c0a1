use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how verbosely [`setup_logging`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set, e.g. `"info"` or `"psf_photometry=debug"`.
    pub base_level: String,
    pub dir: PathBuf,
    /// Files are named `<file_prefix>.<date>.log`.
    pub file_prefix: String,
    /// Rotated files kept on disk.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: "info".to_string(),
            dir: PathBuf::from("logs"),
            file_prefix: "psf_photometry".to_string(),
            max_files: 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum LogSetupError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to create log directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create log file appender: {0}")]
    Appender(String),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global subscriber: console output (warnings and errors on
/// stderr) plus a daily-rotated log file.
///
/// `RUST_LOG` overrides `config.base_level` when set. Only one call per
/// process can succeed.
pub fn setup_logging(config: &LogConfig) -> Result<(), LogSetupError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.base_level))
        .map_err(|e| LogSetupError::InvalidFilter {
            filter: config.base_level.clone(),
            reason: e.to_string(),
        })?;

    std::fs::create_dir_all(&config.dir).map_err(|source| LogSetupError::CreateDir {
        path: config.dir.clone(),
        source,
    })?;

    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .max_log_files(config.max_files)
        .build(&config.dir)
        .map_err(|e| LogSetupError::Appender(e.to_string()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    FILE_GUARD
        .set(guard)
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(console_writer);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    tracing::debug!(dir = ?config.dir, prefix = %config.file_prefix, "File logging enabled");
    Ok(())
}

/// Console-only subscriber for tools and benches. Safe to call repeatedly;
/// only the first call installs anything.
pub fn setup_console_logging(base_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, "info");
        assert_eq!(config.dir, PathBuf::from("logs"));
        assert_eq!(config.max_files, 5);
    }

    #[test]
    fn test_console_logging_can_be_installed_twice() {
        setup_console_logging("debug");
        setup_console_logging("warn");
        tracing::info!("Console logging installed");
    }
}
