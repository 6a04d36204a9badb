//! Configuration file loading.
//!
//! The config file is a single optional `config.json` in the climux home
//! directory. A missing or empty file yields the defaults; a malformed one
//! is an error.

use crate::config::ClimuxConfig;
use crate::error::ConfigError;
use crate::error::config_error::IoSnafu;
use crate::error::config_error::JsonParseSnafu;
use snafu::ResultExt;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Default configuration directory name under the home directory.
pub const DEFAULT_CONFIG_DIR: &str = ".climux";

/// Application configuration file name (JSON).
pub const CONFIG_FILE: &str = "config.json";

/// Log directory name.
pub const LOG_DIR_NAME: &str = "log";

/// Environment variable for a custom climux home directory.
pub const CLIMUX_HOME_ENV: &str = "CLIMUX_HOME";

/// Environment variable for a custom log directory.
pub const CLIMUX_LOG_DIR_ENV: &str = "CLIMUX_LOG_DIR";

/// Get the default configuration directory path (`~/.climux`).
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_DIR)
}

/// Find the climux home directory.
///
/// Checks `CLIMUX_HOME` first, then falls back to `~/.climux`. A relative
/// `CLIMUX_HOME` is resolved against the current working directory.
pub fn find_climux_home() -> PathBuf {
    match std::env::var(CLIMUX_HOME_ENV) {
        Ok(custom_home) => resolve_relative(custom_home),
        Err(_) => default_config_dir(),
    }
}

/// Get the log directory path.
///
/// Checks `CLIMUX_LOG_DIR` first, then falls back to `{climux_home}/log`.
pub fn log_dir() -> PathBuf {
    match std::env::var(CLIMUX_LOG_DIR_ENV) {
        Ok(custom_log_dir) => resolve_relative(custom_log_dir),
        Err(_) => find_climux_home().join(LOG_DIR_NAME),
    }
}

fn resolve_relative(raw: String) -> PathBuf {
    let path = PathBuf::from(&raw);
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&raw))
        .unwrap_or(path)
}

/// Loader for the JSON config file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl Default for ConfigLoader {
    /// A loader for the climux home directory.
    fn default() -> Self {
        Self {
            config_dir: find_climux_home(),
        }
    }
}

impl ConfigLoader {
    /// Create a loader for a specific config directory.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            config_dir: path.as_ref().to_path_buf(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of `config.json` inside the config directory.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Ensure the config directory exists, creating it if necessary.
    pub fn ensure_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir).context(IoSnafu {
                message: format!(
                    "Failed to create config directory {}",
                    self.config_dir.display(),
                ),
            })?;
            debug!(path = %self.config_dir.display(), "Created config directory");
        }
        Ok(())
    }

    /// Load `config.json` from the config directory.
    pub fn load(&self) -> Result<ClimuxConfig, ConfigError> {
        self.load_file(&self.config_file())
    }

    /// Load a config file from an explicit path.
    pub fn load_file(&self, path: &Path) -> Result<ClimuxConfig, ConfigError> {
        load_json_file(path)
    }
}

fn load_json_file<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path).context(IoSnafu {
        message: format!("Failed to read {}", path.display()),
    })?;

    if content.trim().is_empty() {
        debug!(path = %path.display(), "Config file is empty, using defaults");
        return Ok(T::default());
    }

    let value = serde_json::from_str(&content).context(JsonParseSnafu {
        file: path.display().to_string(),
    })?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(value)
}

#[cfg(test)]
#[path = "loader.test.rs"]
mod tests;
