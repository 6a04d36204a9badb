use serde::Deserialize;
use serde::Serialize;
use strum::AsRefStr;
use strum::EnumString;

/// Kind of file access the agent wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FileOperation {
    Read,
    Write,
    Delete,
    Execute,
}

impl FileOperation {
    /// Whether the operation changes the filesystem and therefore needs a
    /// whitelisted location.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Write | Self::Delete)
    }
}

/// Outcome of reviewing a command the agent wants to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ApprovalDecision {
    Approved,
    Denied,
    /// Allowed by policy but risky enough that a human must confirm.
    RequiresUserApproval,
}

impl ApprovalDecision {
    /// The `approved` flag recorded on a command execution: `None` while a
    /// human decision is pending.
    pub fn approved_flag(self) -> Option<bool> {
        match self {
            Self::Approved => Some(true),
            Self::Denied => Some(false),
            Self::RequiresUserApproval => None,
        }
    }
}
