//! Error types for policy construction.

use climux_error::ErrorExt;
use climux_error::Location;
use climux_error::StatusCode;
use climux_error::stack_trace_debug;
use snafu::Snafu;

/// Policy construction errors. Evaluation itself never fails.
#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum PolicyError {
    /// A whitelist or blacklist pattern is not a valid regular expression.
    #[snafu(display("Invalid command pattern `{pattern}`: {source}"))]
    InvalidPattern {
        pattern: String,
        #[snafu(source)]
        source: regex::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for PolicyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPattern { .. } => StatusCode::InvalidPattern,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
