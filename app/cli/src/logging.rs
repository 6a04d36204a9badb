//! Subscriber setup for the binary.

use std::path::PathBuf;

use climux_config::CLIMUX_LOG_DIR_ENV;
use climux_config::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE_PREFIX: &str = "climux.log";

/// Keeps the file writer flushing until the program exits.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber: stderr always, plus a daily log file when
/// a log directory is configured.
///
/// `RUST_LOG` wins over `level_override`, which wins over the config level.
pub fn init_logging(settings: &LoggingSettings, level_override: Option<&str>) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(settings, level_override)));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, file_guard) = match file_log_dir(settings) {
        Some(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            Err(e) => {
                eprintln!("Warning: Could not create log directory {dir:?}: {e}");
                (None, None)
            }
        },
        None => (None, None),
    };

    // Already initialized is fine
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    LoggingGuard {
        _file_guard: file_guard,
    }
}

fn effective_level<'a>(settings: &'a LoggingSettings, level_override: Option<&'a str>) -> &'a str {
    level_override.unwrap_or(&settings.level)
}

/// The configured directory, else `CLIMUX_LOG_DIR` when it is set.
fn file_log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.dir.clone().or_else(|| {
        std::env::var_os(CLIMUX_LOG_DIR_ENV).map(|_| climux_config::log_dir())
    })
}

#[cfg(test)]
#[path = "logging.test.rs"]
mod tests;
