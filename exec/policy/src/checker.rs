//! Command and file-operation checks.

use std::path::Path;
use std::path::PathBuf;

use climux_protocol::CommandExecution;
use path_absolutize::Absolutize;
use regex::Regex;
use snafu::ResultExt;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ApprovalDecision;
use crate::FileOperation;
use crate::PolicyConfig;
use crate::error::Result;
use crate::error::policy_error::InvalidPatternSnafu;

/// Substrings that escalate an allowed command to a human decision.
const ESCALATION_MARKERS: &[&str] = &["sudo", "chmod", "chown", ">>", ">"];

/// Decides whether agent-reported commands and file operations may proceed.
pub trait CommandSecurityPolicy: Send + Sync {
    fn is_command_allowed(&self, command: &str) -> bool;

    fn is_file_operation_allowed(&self, path: &Path, operation: FileOperation) -> bool;

    /// Review a command the agent reported. `None` means the record carried
    /// no command at all.
    fn requires_approval(&self, execution: Option<&CommandExecution>) -> ApprovalDecision;

    fn whitelisted_commands(&self) -> &[String];

    fn blacklisted_commands(&self) -> &[String];

    fn whitelisted_paths(&self) -> &[PathBuf];

    fn blacklisted_paths(&self) -> &[PathBuf];
}

/// Policy driven by a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct DefaultSecurityPolicy {
    config: PolicyConfig,
    whitelisted_prefixes: Vec<String>,
    blacklisted_prefixes: Vec<String>,
    whitelisted_patterns: Vec<Regex>,
    blacklisted_patterns: Vec<Regex>,
    whitelisted_paths: Vec<PathBuf>,
    blacklisted_paths: Vec<PathBuf>,
}

impl DefaultSecurityPolicy {
    /// Build the policy, compiling patterns and resolving configured paths.
    pub fn new(config: PolicyConfig) -> Result<Self> {
        Ok(Self {
            whitelisted_prefixes: fold_all(&config.whitelisted_commands),
            blacklisted_prefixes: fold_all(&config.blacklisted_commands),
            whitelisted_patterns: compile_all(&config.whitelisted_patterns)?,
            blacklisted_patterns: compile_all(&config.blacklisted_patterns)?,
            whitelisted_paths: resolve_all(&config.whitelisted_paths),
            blacklisted_paths: resolve_all(&config.blacklisted_paths),
            config,
        })
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    fn log_decision(&self, command: &str, allowed: bool, reason: &str) {
        if !allowed {
            warn!(command, reason, "Command denied");
        } else if self.config.log_all_commands {
            info!(command, reason, "Command allowed");
        } else {
            debug!(command, reason, "Command allowed");
        }
    }

    fn is_blacklisted_path(&self, path: &Path) -> bool {
        self.blacklisted_paths.iter().any(|denied| {
            // A blacklisted root only covers the root itself; otherwise it
            // would shadow every whitelist entry.
            if denied.parent().is_none() {
                path == denied
            } else {
                path.starts_with(denied)
            }
        })
    }

    fn is_whitelisted_path(&self, path: &Path) -> bool {
        self.whitelisted_paths
            .iter()
            .any(|allowed| path.starts_with(allowed))
    }
}

impl CommandSecurityPolicy for DefaultSecurityPolicy {
    fn is_command_allowed(&self, command: &str) -> bool {
        let folded = command.trim().to_lowercase();
        if folded.is_empty() {
            return false;
        }

        if self
            .blacklisted_prefixes
            .iter()
            .any(|prefix| folded.starts_with(prefix.as_str()))
        {
            self.log_decision(command, false, "blacklisted command");
            return false;
        }
        if self.blacklisted_patterns.iter().any(|p| p.is_match(command)) {
            self.log_decision(command, false, "blacklisted pattern");
            return false;
        }

        if self
            .whitelisted_prefixes
            .iter()
            .any(|prefix| folded.starts_with(prefix.as_str()))
        {
            self.log_decision(command, true, "whitelisted command");
            return true;
        }
        if self.whitelisted_patterns.iter().any(|p| p.is_match(command)) {
            self.log_decision(command, true, "whitelisted pattern");
            return true;
        }

        self.log_decision(command, false, "not whitelisted");
        false
    }

    fn is_file_operation_allowed(&self, path: &Path, operation: FileOperation) -> bool {
        if path.as_os_str().is_empty() {
            return false;
        }

        let resolved = match path.absolutize() {
            Ok(resolved) => resolved.into_owned(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot resolve path, denying");
                return false;
            }
        };

        if self.is_blacklisted_path(&resolved) {
            warn!(
                path = %resolved.display(),
                operation = operation.as_ref(),
                "File operation on blacklisted path"
            );
            return false;
        }

        if operation.is_mutating() && !self.is_whitelisted_path(&resolved) {
            warn!(
                path = %resolved.display(),
                operation = operation.as_ref(),
                "Mutating file operation outside whitelisted paths"
            );
            return false;
        }

        true
    }

    fn requires_approval(&self, execution: Option<&CommandExecution>) -> ApprovalDecision {
        let Some(command) = execution
            .map(|e| e.command.as_str())
            .filter(|c| !c.trim().is_empty())
        else {
            return ApprovalDecision::Denied;
        };

        if self.config.require_approval_for_all_commands {
            return ApprovalDecision::RequiresUserApproval;
        }

        // The blacklist is a veto that approval cannot override
        if !self.is_command_allowed(command) {
            return ApprovalDecision::Denied;
        }

        let folded = command.to_lowercase();
        if ESCALATION_MARKERS
            .iter()
            .any(|marker| folded.contains(marker))
        {
            info!(command, "Command requires user approval");
            return ApprovalDecision::RequiresUserApproval;
        }

        ApprovalDecision::Approved
    }

    fn whitelisted_commands(&self) -> &[String] {
        &self.config.whitelisted_commands
    }

    fn blacklisted_commands(&self) -> &[String] {
        &self.config.blacklisted_commands
    }

    fn whitelisted_paths(&self) -> &[PathBuf] {
        &self.whitelisted_paths
    }

    fn blacklisted_paths(&self) -> &[PathBuf] {
        &self.blacklisted_paths
    }
}

fn fold_all(prefixes: &[String]) -> Vec<String> {
    prefixes
        .iter()
        .map(String::as_str)
        .map(str::to_lowercase)
        .collect()
}

/// Compile patterns so they must match the entire command.
fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})$")).context(InvalidPatternSnafu {
                pattern: pattern.clone(),
            })
        })
        .collect()
}

fn resolve_all(paths: &[String]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(String::as_str)
        .filter_map(resolve_path)
        .collect()
}

/// Expand a leading `~` and make the path absolute.
fn resolve_path(raw: &str) -> Option<PathBuf> {
    let expanded = if raw == "~" {
        dirs::home_dir()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(raw))
    };

    let Some(expanded) = expanded else {
        warn!(path = raw, "No home directory, skipping policy path");
        return None;
    };

    match expanded.absolutize() {
        Ok(resolved) => Some(resolved.into_owned()),
        Err(e) => {
            warn!(path = raw, error = %e, "Cannot resolve policy path, skipping");
            None
        }
    }
}

#[cfg(test)]
#[path = "checker.test.rs"]
mod tests;
