//! The resolved climux configuration.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use climux_policy::PolicyConfig;
use climux_process::ExecutorConfig;
use climux_protocol::ExecutionOptions;
use serde::Deserialize;
use serde::Serialize;
use snafu::ensure;

use crate::env_loader::EnvLoader;
use crate::error::Result;
use crate::error::config_error::InvalidValueSnafu;
use crate::loader::ConfigLoader;

pub const DEFAULT_CLI_PATH: &str = "claude";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";
pub const DEFAULT_OUTPUT_FORMAT: &str = "text";

/// Top-level configuration, as read from `config.json`.
///
/// # Example
///
/// ```json
/// {
///   "cli_path": "/usr/local/bin/claude",
///   "default_model": "claude-3-opus-20240229",
///   "session": { "path_prefix": "claude-session" },
///   "security": { "enabled": true, "blacklisted_commands": ["dd"] },
///   "tmux": { "program": "tmux" },
///   "executor": { "timeout_secs": 300 },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClimuxConfig {
    pub cli_path: String,
    pub default_model: Option<String>,
    pub default_output_format: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub dangerously_skip_permissions: bool,
    pub verbose: bool,
    pub working_directory: Option<PathBuf>,
    /// Directory holding session history and context files. The system
    /// temp directory when unset.
    pub session_directory: Option<PathBuf>,
    /// Passed as `--max-tokens` when set. Unset leaves the CLI default.
    pub default_max_tokens: Option<i32>,
    /// Passed as `--temperature` when set. Unset leaves the CLI default.
    pub default_temperature: Option<f64>,
    pub default_environment_variables: BTreeMap<String, String>,
    pub session: SessionSettings,
    pub security: SecuritySettings,
    pub tmux: TmuxSettings,
    pub executor: ExecutorConfig,
    pub logging: LoggingSettings,
}

impl Default for ClimuxConfig {
    fn default() -> Self {
        Self {
            cli_path: DEFAULT_CLI_PATH.to_string(),
            default_model: Some(DEFAULT_MODEL.to_string()),
            default_output_format: Some(DEFAULT_OUTPUT_FORMAT.to_string()),
            api_key: None,
            api_url: None,
            dangerously_skip_permissions: false,
            verbose: false,
            working_directory: None,
            session_directory: None,
            default_max_tokens: None,
            default_temperature: None,
            default_environment_variables: BTreeMap::new(),
            session: SessionSettings::default(),
            security: SecuritySettings::default(),
            tmux: TmuxSettings::default(),
            executor: ExecutorConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    /// Pass `--history <file>` on every session send.
    pub persist_history: bool,
    /// Pass `--context <file>` on every session send.
    pub persist_context: bool,
    /// Overrides the session directory for history files.
    pub history_directory: Option<PathBuf>,
    /// Overrides the session directory for context files.
    pub context_directory: Option<PathBuf>,
    /// File name prefix for `<prefix>-<id>.history` and `<prefix>-<id>.context`.
    pub path_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            persist_history: true,
            persist_context: true,
            history_directory: None,
            context_directory: None,
            path_prefix: "claude-session".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SecuritySettings {
    /// When false, reported commands are not reviewed at all.
    pub enabled: bool,
    #[serde(flatten)]
    pub policy: PolicyConfig,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: PolicyConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TmuxSettings {
    pub enabled: bool,
    pub program: String,
    pub default_session_prefix: String,
    pub auto_cleanup_on_shutdown: bool,
}

impl Default for TmuxSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "tmux".to_string(),
            default_session_prefix: "claude-".to_string(),
            auto_cleanup_on_shutdown: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Also write logs to daily files in this directory.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl ClimuxConfig {
    /// Load `config.json` from the climux home, then apply env overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(&ConfigLoader::default(), None)
    }

    /// Load from `loader`, or from `file` when given, then apply env
    /// overrides and validate.
    pub fn load_with(loader: &ConfigLoader, file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => loader.load_file(path)?,
            None => loader.load()?,
        };
        EnvLoader::new().apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.cli_path.trim().is_empty(),
            InvalidValueSnafu {
                message: "cli_path must not be empty",
            }
        );
        ensure!(
            self.executor.timeout_secs > 0,
            InvalidValueSnafu {
                message: "executor.timeout_secs must be positive",
            }
        );
        if let Some(max_tokens) = self.default_max_tokens {
            ensure!(
                max_tokens > 0,
                InvalidValueSnafu {
                    message: format!("default_max_tokens must be positive, got {max_tokens}"),
                }
            );
        }
        if let Some(temperature) = self.default_temperature {
            ensure!(
                (0.0..=2.0).contains(&temperature),
                InvalidValueSnafu {
                    message: format!("default_temperature must be within 0..=2, got {temperature}"),
                }
            );
        }
        ensure!(
            !self.session.path_prefix.is_empty(),
            InvalidValueSnafu {
                message: "session.path_prefix must not be empty",
            }
        );
        Ok(())
    }

    /// Base options every invocation starts from.
    pub fn default_options(&self) -> ExecutionOptions {
        ExecutionOptions {
            model: self.default_model.clone(),
            output_format: self.default_output_format.clone(),
            api_key: self.api_key.clone(),
            api_url: self.api_url.clone(),
            dangerously_skip_permissions: self.dangerously_skip_permissions.then_some(true),
            verbose: self.verbose.then_some(true),
            max_tokens: self.default_max_tokens,
            temperature: self.default_temperature,
            environment_variables: (!self.default_environment_variables.is_empty())
                .then(|| self.default_environment_variables.clone()),
            working_directory: self.working_directory.clone(),
            ..ExecutionOptions::default()
        }
    }

    /// Directory for session history and context files.
    pub fn session_dir(&self) -> PathBuf {
        self.session_directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.session
            .history_directory
            .clone()
            .unwrap_or_else(|| self.session_dir())
    }

    pub fn context_dir(&self) -> PathBuf {
        self.session
            .context_directory
            .clone()
            .unwrap_or_else(|| self.session_dir())
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
