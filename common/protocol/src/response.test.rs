use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_status_from_outcome() {
    let ok = ProcessOutcome::completed(0, "out".to_string(), String::new());
    assert_eq!(ResponseStatus::from_outcome(&ok), ResponseStatus::Success);

    let err = ProcessOutcome::completed(2, String::new(), "bad".to_string());
    assert_eq!(ResponseStatus::from_outcome(&err), ResponseStatus::Error);

    let spawn = ProcessOutcome::failed("Process execution failed: not found");
    assert_eq!(ResponseStatus::from_outcome(&spawn), ResponseStatus::Error);

    let timeout = ProcessOutcome::timed_out(
        String::new(),
        String::new(),
        "Process timed out after 1 seconds",
    );
    assert_eq!(ResponseStatus::from_outcome(&timeout), ResponseStatus::Timeout);
}

#[test]
fn test_response_from_outcome() {
    let outcome = ProcessOutcome::completed(0, "answer\n".to_string(), "warn".to_string());
    let resp = AgentResponse::from_outcome(Some("s1"), "question", &outcome);

    assert_eq!(resp.session_id.as_deref(), Some("s1"));
    assert_eq!(resp.prompt, "question");
    assert_eq!(resp.response, "answer\n");
    assert_eq!(resp.raw_output, "answer\n");
    assert_eq!(resp.error_output, "warn");
    assert_eq!(resp.exit_code, 0);
    assert_eq!(resp.status, ResponseStatus::Success);
    assert!(resp.command_executions.is_empty());
}

#[test]
fn test_response_ids_are_unique() {
    let outcome = ProcessOutcome::completed(0, String::new(), String::new());
    let a = AgentResponse::from_outcome(None, "p", &outcome);
    let b = AgentResponse::from_outcome(None, "p", &outcome);
    assert_ne!(a.response_id, b.response_id);
}

#[test]
fn test_timed_out_reason_appended() {
    let outcome = ProcessOutcome::timed_out(
        "partial".to_string(),
        "line".to_string(),
        "Process timed out after 5 seconds",
    );
    assert_eq!(outcome.exit_code, -1);
    assert!(outcome.timed_out);
    assert_eq!(outcome.stdout, "partial");
    assert_eq!(outcome.stderr, "line\nProcess timed out after 5 seconds");
    assert!(!outcome.is_success());
}

#[test]
fn test_status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&ResponseStatus::Timeout).unwrap(),
        "\"timeout\""
    );
    assert_eq!(FileChangeKind::Modify.as_ref(), "modify");
}
