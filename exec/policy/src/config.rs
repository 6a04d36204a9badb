//! Policy configuration.

use serde::Deserialize;
use serde::Serialize;

/// Whitelists, blacklists, and approval switches for
/// [`DefaultSecurityPolicy`](crate::DefaultSecurityPolicy).
///
/// Command lists are literal prefixes compared case-insensitively. Patterns
/// are regular expressions that must match the whole command. Paths may
/// start with `~` for the home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub whitelisted_commands: Vec<String>,
    pub blacklisted_commands: Vec<String>,
    pub whitelisted_patterns: Vec<String>,
    pub blacklisted_patterns: Vec<String>,
    pub whitelisted_paths: Vec<String>,
    pub blacklisted_paths: Vec<String>,
    /// Escalate every command to a human, regardless of the lists.
    pub require_approval_for_all_commands: bool,
    /// Log every command decision at info level, not only denials.
    pub log_all_commands: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            whitelisted_commands: strings(&[
                "ls", "pwd", "echo", "cat", "grep", "find", "which", "date", "whoami",
            ]),
            blacklisted_commands: strings(&[
                "rm -rf /",
                "dd",
                "mkfs",
                "format",
                ":(){:|:&};:",
                "shutdown",
                "reboot",
            ]),
            whitelisted_patterns: strings(&[
                r"^git (status|log|diff|show).*",
                r"^npm (list|info|view).*",
                r"^yarn (list|info|why).*",
            ]),
            blacklisted_patterns: strings(&[
                r".*\brm\s+-rf\s+/.*",
                r".*\bsudo\s+rm.*",
                r".*\b(curl|wget).*\|.*sh.*",
            ]),
            whitelisted_paths: strings(&["~/Documents", "~/Downloads", "/tmp", "/var/tmp"]),
            blacklisted_paths: strings(&[
                "/", "/etc", "/usr", "/bin", "/sbin", "/boot", "/sys", "/proc",
            ]),
            require_approval_for_all_commands: false,
            log_all_commands: true,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
