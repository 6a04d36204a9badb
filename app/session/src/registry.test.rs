use super::*;
use crate::SessionError;
use climux_process::ProcessExecutor;
use climux_protocol::CommandBuilder;
use pretty_assertions::assert_eq;

fn registry() -> SessionRegistry {
    let client = AgentClient::new(ProcessExecutor::default(), CommandBuilder::new("echo"));
    SessionRegistry::new(Arc::new(client))
}

#[test]
fn test_create_and_get() {
    let registry = registry();
    let session = registry.create_session("a", ExecutionOptions::default());

    let fetched = registry.get_session("a").unwrap();
    assert!(Arc::ptr_eq(&session, &fetched));
    assert!(registry.is_session_active("a"));
    assert!(registry.session("a").is_ok());
}

#[test]
fn test_missing_session() {
    let registry = registry();
    assert!(registry.get_session("nope").is_none());
    assert!(!registry.is_session_active("nope"));
    assert!(matches!(
        registry.session("nope"),
        Err(SessionError::NotFound { .. })
    ));
}

#[test]
fn test_destroy_session_closes_it() {
    let registry = registry();
    let session = registry.create_session("a", ExecutionOptions::default());

    registry.destroy_session("a");
    registry.destroy_session("never-created");

    assert!(!session.is_active());
    assert!(registry.get_session("a").is_none());
}

#[test]
fn test_active_session_ids() {
    let registry = registry();
    registry.create_session("a", ExecutionOptions::default());
    registry.create_session("b", ExecutionOptions::default());
    registry.create_session("c", ExecutionOptions::default());
    registry.destroy_session("b");

    let mut ids = registry.active_session_ids();
    ids.sort();
    assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
}

#[test]
fn test_overwrite_closes_previous() {
    let registry = registry();
    let first = registry.create_session("a", ExecutionOptions::default());
    let second = registry.create_session("a", ExecutionOptions::default());

    assert!(!first.is_active());
    assert!(second.is_active());
    assert_eq!(registry.active_session_ids(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_shutdown_closes_everything_once() {
    let registry = registry();
    let a = registry.create_session("a", ExecutionOptions::default());
    let b = registry.create_session("b", ExecutionOptions::default());

    registry.shutdown().await;
    registry.shutdown().await;

    assert!(registry.is_shut_down());
    assert!(!a.is_active());
    assert!(!b.is_active());
    assert!(registry.active_session_ids().is_empty());
    assert!(registry.client().executor().is_shut_down());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sends_across_sessions() {
    let registry = registry();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let session = registry.create_session(&format!("s{i}"), ExecutionOptions::default());
            tokio::spawn(async move { session.send("hi", &ExecutionOptions::default()).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.session_id, Some(format!("s{i}")));
        assert_eq!(response.exit_code, 0);
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_shutdown_kills_tmux_sessions() {
    // `true` answers every tmux query with success.
    let tmux = Arc::new(
        TmuxSessionManager::new(ProcessExecutor::default()).with_program("true"),
    );
    tmux.create_session("claude-work", climux_tmux::TmuxOptions::default())
        .await
        .unwrap();
    assert!(tmux.get_session("claude-work").is_some());

    let registry = registry().with_tmux_cleanup(Arc::clone(&tmux));
    registry.shutdown().await;

    assert!(tmux.get_session("claude-work").is_none());
}
