//! Process execution engine.
//!
//! [`ProcessExecutor`] spawns one OS process per [`CommandInvocation`],
//! drains stdout and stderr concurrently from the moment the child starts,
//! and bounds every run with a wall-clock timeout. Failures to spawn or to
//! observe the child are folded into a [`ProcessOutcome`] with exit code
//! `-1`; nothing in this crate returns an error to its caller.
//!
//! [`CommandInvocation`]: climux_protocol::CommandInvocation
//! [`ProcessOutcome`]: climux_protocol::ProcessOutcome

mod config;
mod drain;
mod executor;
mod stream;

pub use config::DEFAULT_OUTPUT_JOIN_TIMEOUT_SECS;
pub use config::DEFAULT_SHUTDOWN_TIMEOUT_SECS;
pub use config::DEFAULT_TIMEOUT_SECS;
pub use config::ExecutorConfig;
pub use executor::PendingOutcome;
pub use executor::ProcessExecutor;
pub use stream::OutputStream;
pub use stream::StreamEvent;
pub use stream::StreamExit;
