use serde::Deserialize;
use serde::Serialize;

/// Exit code reported when a process could not run or was killed on timeout.
pub const FAILED_EXIT_CODE: i32 = -1;

/// Result of a single process invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessOutcome {
    pub fn completed(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            timed_out: false,
        }
    }

    /// The process never ran, or ran and could not be observed to completion.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            exit_code: FAILED_EXIT_CODE,
            stdout: String::new(),
            stderr: message.into(),
            timed_out: false,
        }
    }

    /// The process was killed at the deadline. `reason` is appended to
    /// whatever stderr was captured.
    pub fn timed_out(stdout: String, stderr: String, reason: &str) -> Self {
        let stderr = if stderr.is_empty() {
            reason.to_string()
        } else if stderr.ends_with('\n') {
            format!("{stderr}{reason}")
        } else {
            format!("{stderr}\n{reason}")
        };
        Self {
            exit_code: FAILED_EXIT_CODE,
            stdout,
            stderr,
            timed_out: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}
