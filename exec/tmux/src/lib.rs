//! Detached tmux sessions that outlive a single agent invocation.
//!
//! Every operation shells out to the tmux binary through the shared
//! [`ProcessExecutor`](climux_process::ProcessExecutor); exit code 0 is the
//! only success signal.

pub mod error;
mod manager;

pub use climux_protocol::MultiplexerOptions as TmuxOptions;
pub use error::Result;
pub use error::TmuxError;
pub use manager::DEFAULT_TMUX_PROGRAM;
pub use manager::TmuxSession;
pub use manager::TmuxSessionManager;
