//! Configuration for climux.
//!
//! Settings are layered: built-in defaults, then `config.json` in the climux
//! home directory, then `CLIMUX_*` environment variables.

mod config;
mod env_loader;
pub mod error;
mod loader;

pub use config::ClimuxConfig;
pub use config::LoggingSettings;
pub use config::SecuritySettings;
pub use config::SessionSettings;
pub use config::TmuxSettings;
pub use env_loader::EnvLoader;
pub use error::ConfigError;
pub use loader::CLIMUX_HOME_ENV;
pub use loader::CLIMUX_LOG_DIR_ENV;
pub use loader::CONFIG_FILE;
pub use loader::ConfigLoader;
pub use loader::DEFAULT_CONFIG_DIR;
pub use loader::default_config_dir;
pub use loader::find_climux_home;
pub use loader::log_dir;
