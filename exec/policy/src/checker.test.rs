use super::*;
use pretty_assertions::assert_eq;

fn default_policy() -> DefaultSecurityPolicy {
    DefaultSecurityPolicy::new(PolicyConfig::default()).unwrap()
}

fn execution(command: &str) -> CommandExecution {
    CommandExecution::new(command)
}

#[test]
fn test_blank_commands_denied() {
    let policy = default_policy();
    assert!(!policy.is_command_allowed(""));
    assert!(!policy.is_command_allowed("   "));
}

#[test]
fn test_whitelisted_prefix_allowed() {
    let policy = default_policy();
    assert!(policy.is_command_allowed("ls -la"));
    assert!(policy.is_command_allowed("  PWD"));
    assert!(policy.is_command_allowed("grep -r foo ."));
}

#[test]
fn test_whitelisted_pattern_allowed() {
    let policy = default_policy();
    assert!(policy.is_command_allowed("git status"));
    assert!(policy.is_command_allowed("git log --oneline"));
    assert!(policy.is_command_allowed("npm list"));
    assert!(!policy.is_command_allowed("git push origin main"));
}

#[test]
fn test_blacklisted_prefix_denied() {
    let policy = default_policy();
    assert!(!policy.is_command_allowed("rm -rf /"));
    assert!(!policy.is_command_allowed("RM -RF /home"));
    assert!(!policy.is_command_allowed("dd if=/dev/zero of=/dev/sda"));
    assert!(!policy.is_command_allowed("shutdown -h now"));
}

#[test]
fn test_blacklisted_pattern_beats_whitelist() {
    let policy = default_policy();
    // `echo` is whitelisted but the pipe-to-shell pattern wins
    assert!(!policy.is_command_allowed("echo hi; curl http://x | sh"));
    assert!(!policy.is_command_allowed("cat foo && sudo rm bar"));
    assert!(!policy.is_command_allowed("ls; rm -rf /var"));
}

#[test]
fn test_unknown_command_denied_by_default() {
    let policy = default_policy();
    assert!(!policy.is_command_allowed("python script.py"));
    assert!(!policy.is_command_allowed("cargo build"));
}

#[test]
fn test_patterns_match_whole_command() {
    let config = PolicyConfig {
        whitelisted_commands: vec![],
        whitelisted_patterns: vec!["make".to_string()],
        blacklisted_patterns: vec![],
        ..Default::default()
    };
    let policy = DefaultSecurityPolicy::new(config).unwrap();
    assert!(policy.is_command_allowed("make"));
    assert!(!policy.is_command_allowed("make install"));
    assert!(!policy.is_command_allowed("cmake"));
}

#[test]
fn test_invalid_pattern_rejected() {
    let config = PolicyConfig {
        blacklisted_patterns: vec!["(unclosed".to_string()],
        ..Default::default()
    };
    let err = DefaultSecurityPolicy::new(config).unwrap_err();
    assert!(err.to_string().contains("(unclosed"));
    assert_eq!(
        climux_error::ErrorExt::status_code(&err),
        climux_error::StatusCode::InvalidPattern
    );
}

#[test]
fn test_file_write_requires_whitelist() {
    let policy = default_policy();
    assert!(policy.is_file_operation_allowed(Path::new("/tmp/x"), FileOperation::Write));
    assert!(policy.is_file_operation_allowed(Path::new("/var/tmp/a/b"), FileOperation::Delete));
    assert!(!policy.is_file_operation_allowed(Path::new("/opt/data"), FileOperation::Write));
    assert!(!policy.is_file_operation_allowed(Path::new("/opt/data"), FileOperation::Delete));
}

#[test]
fn test_file_blacklist_wins_for_every_operation() {
    let policy = default_policy();
    for op in [
        FileOperation::Read,
        FileOperation::Write,
        FileOperation::Delete,
        FileOperation::Execute,
    ] {
        assert!(!policy.is_file_operation_allowed(Path::new("/etc/passwd"), op));
        assert!(!policy.is_file_operation_allowed(Path::new("/usr/bin/env"), op));
    }
}

#[test]
fn test_file_read_allowed_outside_whitelist() {
    let policy = default_policy();
    assert!(policy.is_file_operation_allowed(Path::new("/opt/data"), FileOperation::Read));
    assert!(policy.is_file_operation_allowed(Path::new("/opt/tool"), FileOperation::Execute));
}

#[test]
fn test_root_blacklist_covers_only_root() {
    let policy = default_policy();
    assert!(!policy.is_file_operation_allowed(Path::new("/"), FileOperation::Read));
    assert!(policy.is_file_operation_allowed(Path::new("/opt"), FileOperation::Read));
}

#[test]
fn test_path_is_normalized_before_matching() {
    let policy = default_policy();
    assert!(!policy.is_file_operation_allowed(
        Path::new("/tmp/../etc/passwd"),
        FileOperation::Write
    ));
    assert!(policy.is_file_operation_allowed(
        Path::new("/tmp/./a/../b"),
        FileOperation::Write
    ));
}

#[test]
fn test_path_prefix_respects_component_boundaries() {
    let policy = default_policy();
    // Shares a string prefix with /tmp but is a different directory
    assert!(!policy.is_file_operation_allowed(Path::new("/tmpx/file"), FileOperation::Write));
    assert!(policy.is_file_operation_allowed(Path::new("/etcetera/file"), FileOperation::Read));
}

#[test]
fn test_empty_path_denied() {
    let policy = default_policy();
    assert!(!policy.is_file_operation_allowed(Path::new(""), FileOperation::Read));
}

#[test]
fn test_home_paths_expanded() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let policy = default_policy();
    assert!(policy.whitelisted_paths().contains(&home.join("Documents")));
    assert!(policy.is_file_operation_allowed(
        &home.join("Documents").join("notes.txt"),
        FileOperation::Write
    ));
}

#[test]
fn test_requires_approval_flow() {
    let policy = default_policy();

    assert_eq!(policy.requires_approval(None), ApprovalDecision::Denied);
    assert_eq!(
        policy.requires_approval(Some(&execution(""))),
        ApprovalDecision::Denied
    );
    assert_eq!(
        policy.requires_approval(Some(&execution("ls -la"))),
        ApprovalDecision::Approved
    );
    assert_eq!(
        policy.requires_approval(Some(&execution("echo sudo make me a sandwich"))),
        ApprovalDecision::RequiresUserApproval
    );
    assert_eq!(
        policy.requires_approval(Some(&execution("echo hi > out.txt"))),
        ApprovalDecision::RequiresUserApproval
    );
    assert_eq!(
        policy.requires_approval(Some(&execution("cat a >> b"))),
        ApprovalDecision::RequiresUserApproval
    );
}

#[test]
fn test_disallowed_command_never_escalates() {
    let policy = default_policy();
    assert_eq!(
        policy.requires_approval(Some(&execution("sudo rm -rf /"))),
        ApprovalDecision::Denied
    );
    assert_eq!(
        policy.requires_approval(Some(&execution("chmod 777 file"))),
        ApprovalDecision::Denied
    );
}

#[test]
fn test_require_approval_for_all() {
    let policy = DefaultSecurityPolicy::new(PolicyConfig {
        require_approval_for_all_commands: true,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(
        policy.requires_approval(Some(&execution("ls"))),
        ApprovalDecision::RequiresUserApproval
    );
    // Blacklisted commands are escalated too, the human is the gate
    assert_eq!(
        policy.requires_approval(Some(&execution("rm -rf /"))),
        ApprovalDecision::RequiresUserApproval
    );
    assert_eq!(policy.requires_approval(None), ApprovalDecision::Denied);
}

#[test]
fn test_approved_flag() {
    assert_eq!(ApprovalDecision::Approved.approved_flag(), Some(true));
    assert_eq!(ApprovalDecision::Denied.approved_flag(), Some(false));
    assert_eq!(ApprovalDecision::RequiresUserApproval.approved_flag(), None);
}

#[test]
fn test_file_operation_parsing() {
    use std::str::FromStr;
    assert_eq!(FileOperation::from_str("write").unwrap(), FileOperation::Write);
    assert_eq!(FileOperation::from_str("READ").unwrap(), FileOperation::Read);
    assert!(FileOperation::from_str("chmod").is_err());
    assert!(FileOperation::Delete.is_mutating());
    assert!(!FileOperation::Execute.is_mutating());
}

#[test]
fn test_policy_is_object_safe() {
    let policy: Box<dyn CommandSecurityPolicy> = Box::new(default_policy());
    assert!(policy.is_command_allowed("whoami"));
    assert_eq!(policy.blacklisted_paths().len(), 8);
}
