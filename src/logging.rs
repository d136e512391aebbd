//! File-based logging.
//!
//! The terminal belongs to the status line, so tracing output goes to a
//! daily-rolling file instead of stderr.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingSettings, default_log_dir};

const FALLBACK_LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "cadenza";

/// Where log files go: the configured directory, else the XDG state dir.
pub fn log_dir(settings: &LoggingSettings) -> PathBuf {
    settings
        .directory
        .clone()
        .or_else(default_log_dir)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_LOG_DIR))
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. The returned guard flushes
/// buffered lines when dropped, so keep it alive until shutdown.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<WorkerGuard> {
    let dir = log_dir(settings);
    std::fs::create_dir_all(&dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(&dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = %dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_wins() {
        let settings = LoggingSettings {
            directory: Some(PathBuf::from("/var/log/cadenza")),
            ..LoggingSettings::default()
        };
        assert_eq!(log_dir(&settings), PathBuf::from("/var/log/cadenza"));
    }
}
