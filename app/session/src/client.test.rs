use super::*;
use climux_policy::PolicyConfig;
use climux_process::StreamEvent;
use climux_protocol::CommandExecution;
use climux_protocol::ResponseStatus;
use pretty_assertions::assert_eq;

/// `echo` stands in for the agent and prints the argv it was given.
fn echo_client() -> AgentClient {
    AgentClient::new(ProcessExecutor::default(), CommandBuilder::new("echo"))
}

fn model(name: &str) -> ExecutionOptions {
    ExecutionOptions {
        model: Some(name.to_string()),
        ..ExecutionOptions::default()
    }
}

async fn collect_stdout(stream: OutputStream) -> (Vec<String>, i32) {
    let mut lines = Vec::new();
    let exit = stream
        .for_each_line(|line| lines.push(line.to_string()), |_| {})
        .await;
    (lines, exit.exit_code)
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_merges_client_defaults() {
    let client = echo_client().with_defaults(model("m1"));
    let call = ExecutionOptions {
        verbose: Some(true),
        ..ExecutionOptions::default()
    };

    let response = client.execute("hello", &call).await;

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.exit_code, 0);
    assert_eq!(response.response, "--model m1 --verbose -- hello\n");
    assert_eq!(response.prompt, "hello");
    assert_eq!(response.session_id, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_per_call_options_win() {
    let client = echo_client().with_defaults(model("m1"));
    let response = client.execute("hi", &model("m2")).await;
    assert_eq!(response.response, "--model m2 -- hi\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_update_default_options_replaces() {
    let client = echo_client().with_defaults(model("m1"));
    client.update_default_options(ExecutionOptions {
        verbose: Some(true),
        ..ExecutionOptions::default()
    });

    assert_eq!(client.default_options().model, None);
    let response = client.execute("hi", &ExecutionOptions::default()).await;
    assert_eq!(response.response, "--verbose -- hi\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_agent_is_error_status() {
    let client = AgentClient::new(ProcessExecutor::default(), CommandBuilder::new("false"));
    let response = client.execute("hi", &ExecutionOptions::default()).await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.exit_code, 1);
}

#[tokio::test]
async fn test_missing_agent_binary() {
    let client = AgentClient::new(
        ProcessExecutor::default(),
        CommandBuilder::new("/nonexistent/climux-agent"),
    );
    let response = client.execute("hi", &ExecutionOptions::default()).await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.exit_code, -1);
    assert!(response.error_output.starts_with("Process execution failed"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_async() {
    let client = echo_client();
    let pending = client.execute_async("later", &model("m1"));
    let response = pending.await;
    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.response, "--model m1 -- later\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_stream_forces_stream_json() {
    let client = echo_client().with_defaults(ExecutionOptions {
        output_format: Some("text".to_string()),
        ..ExecutionOptions::default()
    });

    let stream = client.execute_stream("go", &ExecutionOptions::default());
    let (lines, exit_code) = collect_stdout(stream).await;

    assert_eq!(exit_code, 0);
    assert_eq!(lines, vec!["--output-format stream-json -- go".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_execute_stream_events_end_with_exit() {
    use tokio_stream::StreamExt;

    let client = echo_client();
    let events: Vec<StreamEvent> = client
        .execute_stream("go", &ExecutionOptions::default())
        .collect()
        .await;
    assert!(matches!(events.last(), Some(StreamEvent::Exited(exit)) if exit.exit_code == 0));
}

#[test]
fn test_review_commands_with_policy() {
    let policy = DefaultSecurityPolicy::new(PolicyConfig::default()).unwrap();
    let client = echo_client().with_policy(Arc::new(policy));

    let mut response = AgentResponse::from_outcome(
        None,
        "p",
        &climux_protocol::ProcessOutcome::completed(0, String::new(), String::new()),
    );
    response.command_executions = vec![
        CommandExecution::new("git status"),
        CommandExecution::new("rm -rf /"),
        CommandExecution::new("ls > listing.txt"),
    ];

    let decisions = client.review_commands(&mut response);

    assert_eq!(
        decisions,
        vec![
            ApprovalDecision::Approved,
            ApprovalDecision::Denied,
            ApprovalDecision::RequiresUserApproval,
        ]
    );
    let approved: Vec<Option<bool>> = response
        .command_executions
        .iter()
        .map(|c| c.approved)
        .collect();
    assert_eq!(approved, vec![Some(true), Some(false), None]);
}

#[test]
fn test_review_commands_without_policy_is_skipped() {
    let client = echo_client();
    let mut response = AgentResponse::from_outcome(
        None,
        "p",
        &climux_protocol::ProcessOutcome::completed(0, String::new(), String::new()),
    );
    response.command_executions = vec![CommandExecution::new("rm -rf /")];

    assert!(client.review_commands(&mut response).is_empty());
    assert_eq!(response.command_executions[0].approved, None);
}

#[test]
fn test_from_config() {
    let mut config = ClimuxConfig::default();
    assert!(AgentClient::from_config(&config).unwrap().policy().is_some());

    config.security.enabled = false;
    let client = AgentClient::from_config(&config).unwrap();
    assert!(client.policy().is_none());
    assert_eq!(client.default_options(), config.default_options());

    config.security.enabled = true;
    config.security.policy.blacklisted_patterns = vec!["(".to_string()];
    let err = AgentClient::from_config(&config).unwrap_err();
    assert!(matches!(err, crate::SessionError::InvalidPolicy { .. }));
}
