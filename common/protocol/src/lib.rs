//! Shared data types for climux.
//!
//! Everything that crosses a crate boundary lives here: the sparse
//! [`ExecutionOptions`] record and its merge rule, the immutable
//! [`CommandInvocation`] handed to the process engine, the
//! [`ProcessOutcome`] it returns, and the [`AgentResponse`] built from it.

pub mod command_builder;
pub mod invocation;
pub mod options;
pub mod outcome;
pub mod response;

pub use command_builder::CommandBuilder;
pub use command_builder::DEFAULT_CLI_PATH;
pub use invocation::CommandInvocation;
pub use options::ExecutionMode;
pub use options::ExecutionOptions;
pub use options::MultiplexerOptions;
pub use outcome::FAILED_EXIT_CODE;
pub use outcome::ProcessOutcome;
pub use response::AgentResponse;
pub use response::CommandExecution;
pub use response::FileChange;
pub use response::FileChangeKind;
pub use response::ResponseStatus;
pub use response::ToolCall;
