//! Agent invocations, one-shot or inside named sessions.
//!
//! [`AgentClient`] turns a prompt and [`ExecutionOptions`] into a process
//! run. [`SessionRegistry`] hands out [`AgentSession`]s that remember their
//! default options and point the agent at per-session history and context
//! files.
//!
//! [`ExecutionOptions`]: climux_protocol::ExecutionOptions

mod client;
pub mod error;
mod layout;
mod registry;
mod session;

pub use client::AgentClient;
pub use client::PendingResponse;
pub use client::STREAM_OUTPUT_FORMAT;
pub use error::Result;
pub use error::SessionError;
pub use layout::DEFAULT_PATH_PREFIX;
pub use layout::SessionLayout;
pub use registry::SessionRegistry;
pub use session::AgentSession;
