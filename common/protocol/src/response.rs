//! Agent response model.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;
use uuid::Uuid;

use crate::ProcessOutcome;

/// Overall status of one agent request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Partial,
    Error,
    Cancelled,
    Timeout,
}

impl ResponseStatus {
    /// Derive the status from a process outcome. A timeout wins over any
    /// exit code.
    pub fn from_outcome(outcome: &ProcessOutcome) -> Self {
        if outcome.timed_out {
            Self::Timeout
        } else if outcome.exit_code == 0 {
            Self::Success
        } else {
            Self::Error
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FileChangeKind {
    Create,
    Modify,
    Delete,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file_path: String,
    pub change_type: FileChangeKind,
    #[serde(default)]
    pub content: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A command the agent reports having run, or wanting to run.
///
/// `approved` is filled in by a policy review: `Some(true)` approved,
/// `Some(false)` denied, `None` waiting on a human.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandExecution {
    pub command: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i32>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub approved: Option<bool>,
}

impl CommandExecution {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: None,
            error: None,
            exit_code: None,
            timestamp: Utc::now(),
            approved: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentResponse {
    pub response_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub prompt: String,
    pub response: String,
    pub status: ResponseStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub file_changes: Vec<FileChange>,
    #[serde(default)]
    pub command_executions: Vec<CommandExecution>,
    pub raw_output: String,
    pub error_output: String,
    pub exit_code: i32,
}

impl AgentResponse {
    pub fn from_outcome(session_id: Option<&str>, prompt: &str, outcome: &ProcessOutcome) -> Self {
        Self {
            response_id: Uuid::new_v4(),
            session_id: session_id.map(str::to_string),
            prompt: prompt.to_string(),
            response: outcome.stdout.clone(),
            status: ResponseStatus::from_outcome(outcome),
            timestamp: Utc::now(),
            tool_calls: Vec::new(),
            file_changes: Vec::new(),
            command_executions: Vec::new(),
            raw_output: outcome.stdout.clone(),
            error_output: outcome.stderr.clone(),
            exit_code: outcome.exit_code,
        }
    }
}

#[cfg(test)]
#[path = "response.test.rs"]
mod tests;
