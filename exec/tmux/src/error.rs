//! Error types for multiplexer control.

use climux_error::ErrorExt;
use climux_error::Location;
use climux_error::StatusCode;
use climux_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum TmuxError {
    /// The named session does not exist on the tmux server.
    #[snafu(display("Tmux session does not exist: {name}"))]
    SessionNotFound {
        name: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Failed to create tmux session {name}: {stderr}"))]
    CreateFailed {
        name: String,
        stderr: String,
        #[snafu(implicit)]
        location: Location,
    },

    /// A control command ran against an existing session and exited non-zero.
    #[snafu(display("tmux {command} exited with {exit_code}: {stderr}"))]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for TmuxError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound { .. } => StatusCode::MultiplexerSessionNotFound,
            Self::CreateFailed { .. } | Self::CommandFailed { .. } => {
                StatusCode::MultiplexerCommandFailed
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, TmuxError>;
