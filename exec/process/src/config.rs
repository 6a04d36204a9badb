use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Default wall-clock limit for one process run (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default bound on collecting the remaining output after the child exits.
pub const DEFAULT_OUTPUT_JOIN_TIMEOUT_SECS: u64 = 5;

/// Default time [`ProcessExecutor::shutdown`] waits before killing stragglers.
///
/// [`ProcessExecutor::shutdown`]: crate::ProcessExecutor::shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Timing configuration for [`ProcessExecutor`](crate::ProcessExecutor).
///
/// # Example
///
/// ```json
/// {
///   "executor": {
///     "timeout_secs": 600,
///     "output_join_timeout_secs": 5,
///     "shutdown_timeout_secs": 10
///   }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExecutorConfig {
    pub timeout_secs: u64,
    pub output_join_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_join_timeout_secs: DEFAULT_OUTPUT_JOIN_TIMEOUT_SECS,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn output_join_timeout(&self) -> Duration {
        Duration::from_secs(self.output_join_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
