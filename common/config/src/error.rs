//! Error types for configuration loading.

use climux_error::ErrorExt;
use climux_error::Location;
use climux_error::StatusCode;
use climux_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[snafu(display("IO error: {message}"))]
    Io {
        message: String,
        #[snafu(source)]
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// The config file is not valid JSON for [`ClimuxConfig`](crate::ClimuxConfig).
    #[snafu(display("Invalid JSON in {file}: {source}"))]
    JsonParse {
        file: String,
        #[snafu(source)]
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// A value parsed but is out of range.
    #[snafu(display("Invalid config value: {message}"))]
    InvalidValue {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Io { .. } => StatusCode::ConfigFileError,
            Self::JsonParse { .. } => StatusCode::InvalidJson,
            Self::InvalidValue { .. } => StatusCode::InvalidConfig,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
