use super::*;
use climux_process::ProcessExecutor;
use climux_protocol::CommandBuilder;
use pretty_assertions::assert_eq;

fn args(prompt: &str) -> RunArgs {
    RunArgs {
        prompt: prompt.to_string(),
        model: None,
        session: None,
        stream: false,
        working_dir: None,
    }
}

#[test]
fn test_call_options() {
    let mut run_args = args("hi");
    run_args.model = Some("m1".to_string());
    run_args.working_dir = Some(PathBuf::from("/tmp"));

    let options = call_options(&run_args);
    assert_eq!(options.model.as_deref(), Some("m1"));
    assert_eq!(options.working_directory, Some(PathBuf::from("/tmp")));
    assert_eq!(options.output_format, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_dispatch_in_session() {
    let client = Arc::new(AgentClient::new(
        ProcessExecutor::default(),
        CommandBuilder::new("echo"),
    ));
    let dir = tempfile::tempdir().unwrap();
    let registry = SessionRegistry::new(Arc::clone(&client))
        .with_layout(SessionLayout::in_dir(dir.path()));

    let mut run_args = args("hello");
    run_args.session = Some("s1".to_string());

    assert!(dispatch(&client, &registry, &run_args).await.unwrap());
    assert!(registry.is_session_active("s1"));

    registry.shutdown().await;
    assert!(!registry.is_session_active("s1"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_failure_exit_code() {
    let mut config = ClimuxConfig::default();
    config.cli_path = "false".to_string();

    assert!(!execute(&config, &args("hi")).await.unwrap());
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_stream() {
    let mut config = ClimuxConfig::default();
    config.cli_path = "echo".to_string();
    let mut run_args = args("hi");
    run_args.stream = true;

    assert!(execute(&config, &run_args).await.unwrap());
}

#[test]
fn test_render_response_json() {
    let outcome = climux_protocol::ProcessOutcome::completed(0, "done\n".to_string(), String::new());
    let response = AgentResponse::from_outcome(Some("s1"), "hi", &outcome);

    let value: serde_json::Value = serde_json::from_str(&render(&response).unwrap()).unwrap();
    assert_eq!(value["session_id"], serde_json::json!("s1"));
    assert_eq!(value["status"], serde_json::json!("success"));
    assert_eq!(value["response"], serde_json::json!("done\n"));
}
