use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Subcommand;
use climux_config::ClimuxConfig;
use climux_policy::ApprovalDecision;
use climux_policy::CommandSecurityPolicy;
use climux_policy::DefaultSecurityPolicy;
use climux_policy::FileOperation;
use serde::Serialize;

#[derive(Subcommand, Debug)]
pub enum PolicyCommand {
    /// Print whether a command is allowed and whether it needs approval
    CheckCommand {
        /// Full command line, quoted
        command: String,
    },

    /// Print whether a file operation is allowed
    CheckFile {
        path: PathBuf,
        /// One of: read, write, delete, execute
        operation: FileOperation,
    },
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct CommandReport {
    pub command: String,
    pub allowed: bool,
    pub decision: ApprovalDecision,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub operation: FileOperation,
    pub allowed: bool,
}

pub fn check_command(policy: &dyn CommandSecurityPolicy, command: &str) -> CommandReport {
    let execution = climux_protocol::CommandExecution::new(command);
    CommandReport {
        command: command.to_string(),
        allowed: policy.is_command_allowed(command),
        decision: policy.requires_approval(Some(&execution)),
    }
}

pub fn check_file(
    policy: &dyn CommandSecurityPolicy,
    path: &Path,
    operation: FileOperation,
) -> FileReport {
    FileReport {
        path: path.to_path_buf(),
        operation,
        allowed: policy.is_file_operation_allowed(path, operation),
    }
}

/// Prints a JSON report; exits non-zero when the answer is "no".
pub fn run(config: &ClimuxConfig, command: PolicyCommand) -> anyhow::Result<ExitCode> {
    let policy = DefaultSecurityPolicy::new(config.security.policy.clone())
        .context("invalid security policy in config")?;

    let (json, allowed) = match command {
        PolicyCommand::CheckCommand { command } => {
            let report = check_command(&policy, &command);
            let allowed = report.decision != ApprovalDecision::Denied;
            (serde_json::to_string_pretty(&report)?, allowed)
        }
        PolicyCommand::CheckFile { path, operation } => {
            let report = check_file(&policy, &path, operation);
            let allowed = report.allowed;
            (serde_json::to_string_pretty(&report)?, allowed)
        }
    };
    println!("{json}");
    Ok(if allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
#[path = "policy.test.rs"]
mod tests;
