use super::*;
use climux_policy::PolicyConfig;
use pretty_assertions::assert_eq;

fn default_policy() -> DefaultSecurityPolicy {
    DefaultSecurityPolicy::new(PolicyConfig::default()).unwrap()
}

#[test]
fn test_check_command_reports() {
    let policy = default_policy();

    let report = check_command(&policy, "git status");
    assert_eq!(
        report,
        CommandReport {
            command: "git status".to_string(),
            allowed: true,
            decision: ApprovalDecision::Approved,
        }
    );

    let report = check_command(&policy, "rm -rf /");
    assert!(!report.allowed);
    assert_eq!(report.decision, ApprovalDecision::Denied);

    let report = check_command(&policy, "ls > out.txt");
    assert!(report.allowed);
    assert_eq!(report.decision, ApprovalDecision::RequiresUserApproval);
}

#[test]
fn test_check_file_reports() {
    let policy = default_policy();

    assert!(!check_file(&policy, Path::new("/etc/passwd"), FileOperation::Write).allowed);
    assert!(check_file(&policy, Path::new("/tmp/x"), FileOperation::Write).allowed);
}

#[test]
fn test_report_json_shape() {
    let policy = default_policy();
    let json = serde_json::to_value(check_file(
        &policy,
        Path::new("/tmp/x"),
        FileOperation::Delete,
    ))
    .unwrap();
    assert_eq!(json["operation"], serde_json::json!("delete"));
    assert_eq!(json["allowed"], serde_json::json!(true));
}

#[test]
fn test_cli_parses_operation() {
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: PolicyCommand,
    }

    let parsed = Wrapper::try_parse_from(["policy", "check-file", "/tmp/x", "WRITE"]).unwrap();
    match parsed.command {
        PolicyCommand::CheckFile { path, operation } => {
            assert_eq!(path, PathBuf::from("/tmp/x"));
            assert_eq!(operation, FileOperation::Write);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
