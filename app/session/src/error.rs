use climux_error::ErrorExt;
use climux_error::Location;
use climux_error::StatusCode;
use climux_error::stack_trace_debug;
use climux_policy::PolicyError;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum SessionError {
    /// The session was closed; nothing was sent.
    #[snafu(display("Session is not active: {id}"))]
    SessionClosed {
        id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Session not found: {id}"))]
    NotFound {
        id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("Invalid security policy"))]
    InvalidPolicy {
        #[snafu(source)]
        source: PolicyError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionClosed { .. } => StatusCode::SessionClosed,
            Self::NotFound { .. } => StatusCode::SessionNotFound,
            Self::InvalidPolicy { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
