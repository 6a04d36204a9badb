//! Environment variable overrides for [`ClimuxConfig`].

use crate::config::ClimuxConfig;
use std::env;
use tracing::debug;

pub const ENV_CLI_PATH: &str = "CLIMUX_CLI_PATH";
pub const ENV_MODEL: &str = "CLIMUX_MODEL";
pub const ENV_API_KEY: &str = "CLIMUX_API_KEY";
pub const ENV_API_URL: &str = "CLIMUX_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "CLIMUX_TIMEOUT_SECS";
pub const ENV_REQUIRE_APPROVAL: &str = "CLIMUX_REQUIRE_APPROVAL";
pub const ENV_TMUX_PROGRAM: &str = "CLIMUX_TMUX_PROGRAM";
pub const ENV_LOG_LEVEL: &str = "CLIMUX_LOG_LEVEL";

/// Applies `CLIMUX_*` environment variables on top of a loaded config.
#[derive(Debug, Default)]
pub struct EnvLoader;

impl EnvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Overwrite the fields of `config` that have an environment override.
    pub fn apply(&self, config: &mut ClimuxConfig) {
        if let Some(val) = self.get_string(ENV_CLI_PATH) {
            debug!(env = ENV_CLI_PATH, value = %val, "loaded");
            config.cli_path = val;
        }

        if let Some(val) = self.get_string(ENV_MODEL) {
            debug!(env = ENV_MODEL, value = %val, "loaded");
            config.default_model = Some(val);
        }

        // Never log the key itself.
        if let Some(val) = self.get_string(ENV_API_KEY) {
            debug!(env = ENV_API_KEY, "loaded");
            config.api_key = Some(val);
        }

        if let Some(val) = self.get_string(ENV_API_URL) {
            debug!(env = ENV_API_URL, value = %val, "loaded");
            config.api_url = Some(val);
        }

        if let Some(val) = self.get_u64(ENV_TIMEOUT_SECS) {
            debug!(env = ENV_TIMEOUT_SECS, value = val, "loaded");
            config.executor.timeout_secs = val;
        }

        if let Some(val) = self.get_bool(ENV_REQUIRE_APPROVAL) {
            debug!(env = ENV_REQUIRE_APPROVAL, value = val, "loaded");
            config.security.policy.require_approval_for_all_commands = val;
        }

        if let Some(val) = self.get_string(ENV_TMUX_PROGRAM) {
            debug!(env = ENV_TMUX_PROGRAM, value = %val, "loaded");
            config.tmux.program = val;
        }

        if let Some(val) = self.get_string(ENV_LOG_LEVEL) {
            debug!(env = ENV_LOG_LEVEL, value = %val, "loaded");
            config.logging.level = val;
        }
    }

    /// Get a string value, treating an empty variable as unset.
    fn get_string(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|s| !s.is_empty())
    }

    /// Get a u64 value from environment.
    ///
    /// Logs a warning if the value is set but cannot be parsed.
    fn get_u64(&self, key: &str) -> Option<u64> {
        self.get_string(key).and_then(|s| match s.parse::<u64>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, value = %s, "Failed to parse u64 from env var");
                None
            }
        })
    }

    /// Get a boolean value from environment.
    ///
    /// Accepts `1`/`true`/`yes` and `0`/`false`/`no`, case-insensitively.
    /// Anything else is ignored with a warning.
    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_string(key).and_then(|s| {
            match s.to_lowercase().as_str() {
                "1" | "true" | "yes" => Some(true),
                "0" | "false" | "no" => Some(false),
                _ => {
                    tracing::warn!(key, value = %s, "Unrecognized boolean value, ignoring");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "env_loader.test.rs"]
mod tests;
