use super::*;
use crate::SessionError;
use crate::SessionRegistry;
use climux_error::ErrorExt;
use climux_error::StatusCode;
use climux_process::ProcessExecutor;
use climux_protocol::CommandBuilder;
use climux_protocol::ResponseStatus;
use pretty_assertions::assert_eq;

fn registry_in(dir: &str) -> SessionRegistry {
    let client = AgentClient::new(ProcessExecutor::default(), CommandBuilder::new("echo"));
    SessionRegistry::new(Arc::new(client)).with_layout(SessionLayout::in_dir(dir))
}

fn model(name: &str) -> ExecutionOptions {
    ExecutionOptions {
        model: Some(name.to_string()),
        ..ExecutionOptions::default()
    }
}

#[test]
fn test_session_file_paths() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", ExecutionOptions::default());

    assert_eq!(session.id(), "abc");
    assert_eq!(
        session.history_file(),
        Path::new("/var/tmp/climux/claude-session-abc.history")
    );
    assert_eq!(
        session.context_file(),
        Path::new("/var/tmp/climux/claude-session-abc.context")
    );
}

#[test]
fn test_effective_options_layering() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session(
        "s1",
        ExecutionOptions {
            model: Some("session-model".to_string()),
            verbose: Some(true),
            history_file: Some(PathBuf::from("/ignored.history")),
            ..ExecutionOptions::default()
        },
    );

    let effective = session.effective_options(&model("call-model"));

    assert_eq!(effective.model.as_deref(), Some("call-model"));
    assert_eq!(effective.verbose, Some(true));
    // Session-scoped files win over the defaults.
    assert_eq!(effective.history_file.as_deref(), Some(session.history_file()));
    assert_eq!(effective.context_file.as_deref(), Some(session.context_file()));

    let overridden = session.effective_options(&ExecutionOptions {
        context_file: Some(PathBuf::from("/custom.context")),
        ..ExecutionOptions::default()
    });
    assert_eq!(
        overridden.context_file,
        Some(PathBuf::from("/custom.context"))
    );
}

#[test]
fn test_persist_flags_omit_files() {
    let client = AgentClient::new(ProcessExecutor::default(), CommandBuilder::new("echo"));
    let layout = SessionLayout {
        persist_history: false,
        ..SessionLayout::in_dir("/var/tmp/climux")
    };
    let registry = SessionRegistry::new(Arc::new(client)).with_layout(layout);
    let session = registry.create_session("s1", ExecutionOptions::default());

    let effective = session.effective_options(&ExecutionOptions::default());
    assert_eq!(effective.history_file, None);
    assert_eq!(effective.context_file.as_deref(), Some(session.context_file()));
}

#[cfg(unix)]
#[tokio::test]
async fn test_send_passes_session_files() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", model("m1"));

    let response = session.send("hello", &ExecutionOptions::default()).await.unwrap();

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.session_id.as_deref(), Some("abc"));
    assert_eq!(
        response.response,
        "--model m1 \
         --context /var/tmp/climux/claude-session-abc.context \
         --history /var/tmp/climux/claude-session-abc.history \
         -- hello\n"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_send_async_and_stream() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", ExecutionOptions::default());

    let response = session
        .send_async("later", &model("m2"))
        .unwrap()
        .await;
    assert_eq!(response.session_id.as_deref(), Some("abc"));
    assert!(response.response.starts_with("--model m2 "));

    let outcome = session
        .send_stream("now", &ExecutionOptions::default())
        .unwrap()
        .into_outcome()
        .await;
    assert_eq!(outcome.exit_code, 0);
    assert!(outcome.stdout.starts_with("--output-format stream-json --context "));
    assert!(outcome.stdout.ends_with("-- now\n"));
}

#[tokio::test]
async fn test_send_after_close_fails() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", ExecutionOptions::default());

    session.close();

    assert!(!session.is_active());
    let err = session
        .send("hello", &ExecutionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::SessionClosed { ref id, .. } if id == "abc"));
    assert_eq!(err.status_code(), StatusCode::SessionClosed);
    assert!(matches!(
        session.send_async("x", &ExecutionOptions::default()),
        Err(SessionError::SessionClosed { .. })
    ));
    assert!(matches!(
        session.send_stream("x", &ExecutionOptions::default()),
        Err(SessionError::SessionClosed { .. })
    ));
}

#[test]
fn test_close_is_idempotent_and_removes_from_registry() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", ExecutionOptions::default());

    session.close();
    session.close();

    assert!(!session.is_active());
    assert!(registry.get_session("abc").is_none());
    assert!(!registry.is_session_active("abc"));
}

#[test]
fn test_closing_replaced_session_keeps_new_entry() {
    let registry = registry_in("/var/tmp/climux");
    let old = registry.create_session("abc", ExecutionOptions::default());
    let new = registry.create_session("abc", ExecutionOptions::default());

    // The replaced session was closed on overwrite.
    assert!(!old.is_active());
    old.close();

    let current = registry.get_session("abc").unwrap();
    assert!(Arc::ptr_eq(&current, &new));
    assert!(registry.is_session_active("abc"));
}

#[test]
fn test_update_default_options() {
    let registry = registry_in("/var/tmp/climux");
    let session = registry.create_session("abc", model("m1"));

    session.update_default_options(ExecutionOptions {
        verbose: Some(true),
        ..ExecutionOptions::default()
    });

    let effective = session.effective_options(&ExecutionOptions::default());
    assert_eq!(effective.model, None);
    assert_eq!(effective.verbose, Some(true));
}
