//! Command and file-operation security policy.
//!
//! The policy is advisory: it answers whether a command or file operation
//! reported by the agent may proceed, and never runs or blocks anything
//! itself. The stance is default-deny for commands and for mutating file
//! operations, and blacklists always win over whitelists.

mod checker;
mod config;
mod decision;
pub mod error;

pub use checker::CommandSecurityPolicy;
pub use checker::DefaultSecurityPolicy;
pub use config::PolicyConfig;
pub use decision::ApprovalDecision;
pub use decision::FileOperation;
pub use error::PolicyError;
pub use error::Result;
