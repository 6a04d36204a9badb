use super::*;
use crate::TmuxError;
use climux_error::ErrorExt;
use climux_error::StatusCode;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::TempDir;

/// A stand-in for the tmux CLI: sessions are files under `state/`, and every
/// call is appended to `calls.log`.
const FAKE_TMUX: &str = r#"#!/bin/sh
STATE="__ROOT__/state"
echo "$*" >> "__ROOT__/calls.log"
cmd="$1"
shift
case "$cmd" in
  has-session)
    [ -f "$STATE/$2" ]
    ;;
  new-session)
    name=""
    while [ $# -gt 0 ]; do
      case "$1" in
        -s) name="$2"; shift 2 ;;
        *) shift ;;
      esac
    done
    if [ -f "$STATE/$name" ]; then
      echo "duplicate session: $name" >&2
      exit 1
    fi
    : > "$STATE/$name"
    ;;
  send-keys)
    echo "$3" >> "$STATE/$2"
    ;;
  capture-pane)
    if [ -f "__ROOT__/capture-fails" ]; then
      echo "capture failed" >&2
      exit 1
    fi
    cat "$STATE/$2"
    ;;
  attach-session)
    echo "open terminal failed: not a terminal" >&2
    exit 1
    ;;
  kill-session)
    if [ -f "__ROOT__/kill-fails" ]; then
      echo "server busy" >&2
      exit 1
    fi
    if [ ! -f "$STATE/$2" ]; then
      echo "can't find session: $2" >&2
      exit 1
    fi
    rm "$STATE/$2"
    ;;
  list-sessions)
    ls "$STATE" | grep . || { echo "no server running" >&2; exit 1; }
    ;;
  *)
    exit 2
    ;;
esac
"#;

struct FakeTmux {
    root: TempDir,
    program: PathBuf,
}

impl FakeTmux {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("state")).unwrap();
        let program = root.path().join("tmux");
        let script = FAKE_TMUX.replace("__ROOT__", &root.path().display().to_string());
        std::fs::write(&program, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        Self { root, program }
    }

    fn manager(&self) -> TmuxSessionManager {
        TmuxSessionManager::new(ProcessExecutor::default())
            .with_program(self.program.display().to_string())
    }

    /// Simulate a session started outside the manager.
    fn add_external_session(&self, name: &str) {
        std::fs::write(self.state().join(name), "").unwrap();
    }

    fn state(&self) -> PathBuf {
        self.root.path().join("state")
    }

    fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.root.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_create_session_with_window() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    let options = TmuxOptions {
        window_name: Some("main".to_string()),
        ..TmuxOptions::default()
    };

    let session = manager.create_session("claude-1", options.clone()).await.unwrap();

    assert_eq!(session.name(), "claude-1");
    assert_eq!(session.options(), &options);
    assert!(fake.state().join("claude-1").exists());
    assert!(fake.calls().contains(&"new-session -d -s claude-1 -n main".to_string()));
    assert_eq!(manager.get_session("claude-1"), Some(session));
}

#[cfg(unix)]
#[tokio::test]
async fn test_create_existing_session_returns_cached_handle() {
    let fake = FakeTmux::new();
    let manager = fake.manager();

    let first = manager
        .create_session("claude-1", TmuxOptions::default())
        .await
        .unwrap();
    let other_options = TmuxOptions {
        window_name: Some("ignored".to_string()),
        ..TmuxOptions::default()
    };
    let second = manager.create_session("claude-1", other_options).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fake.count_calls("new-session"), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_create_adopts_external_session() {
    let fake = FakeTmux::new();
    fake.add_external_session("external");
    let manager = fake.manager();

    let session = manager
        .create_session("external", TmuxOptions::default())
        .await
        .unwrap();

    assert_eq!(session.name(), "external");
    assert_eq!(fake.count_calls("new-session"), 0);
    assert!(manager.get_session("external").is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn test_create_failure() {
    let manager = TmuxSessionManager::new(ProcessExecutor::default()).with_program("false");

    let err = manager
        .create_session("claude-1", TmuxOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TmuxError::CreateFailed { .. }));
    assert_eq!(err.status_code(), StatusCode::MultiplexerCommandFailed);
    assert!(manager.get_session("claude-1").is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_send_command_and_capture_pane() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager
        .create_session("work", TmuxOptions::default())
        .await
        .unwrap();

    manager.send_command("work", "echo hello").await.unwrap();
    manager.send_command("work", "ls -la").await.unwrap();

    let pane = manager.capture_pane("work").await.unwrap();
    assert_eq!(pane, "echo hello\nls -la\n");
    assert!(fake.calls().contains(&"send-keys -t work echo hello Enter".to_string()));
}

#[cfg(unix)]
#[tokio::test]
async fn test_operations_on_missing_session() {
    let fake = FakeTmux::new();
    let manager = fake.manager();

    let err = manager.send_command("ghost", "ls").await.unwrap_err();
    assert!(matches!(err, TmuxError::SessionNotFound { ref name, .. } if name == "ghost"));
    assert_eq!(err.status_code(), StatusCode::MultiplexerSessionNotFound);

    assert!(matches!(
        manager.capture_pane("ghost").await,
        Err(TmuxError::SessionNotFound { .. })
    ));
    assert!(matches!(
        manager.attach_session("ghost").await,
        Err(TmuxError::SessionNotFound { .. })
    ));
    assert_eq!(fake.count_calls("send-keys"), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_capture_failure_yields_empty() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager
        .create_session("work", TmuxOptions::default())
        .await
        .unwrap();
    std::fs::write(fake.root.path().join("capture-fails"), "").unwrap();

    assert_eq!(manager.capture_pane("work").await.unwrap(), "");
}

#[cfg(unix)]
#[tokio::test]
async fn test_attach_failure_is_command_failed() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager
        .create_session("work", TmuxOptions::default())
        .await
        .unwrap();

    let err = manager.attach_session("work").await.unwrap_err();
    match err {
        TmuxError::CommandFailed {
            command,
            exit_code,
            stderr,
            ..
        } => {
            assert_eq!(command, "attach-session");
            assert_eq!(exit_code, 1);
            assert!(stderr.contains("not a terminal"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_kill_session_and_kill_absent() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager
        .create_session("work", TmuxOptions::default())
        .await
        .unwrap();

    manager.kill_session("work").await.unwrap();
    assert!(!manager.session_exists("work").await);
    assert!(manager.get_session("work").is_none());

    // Already gone.
    manager.kill_session("work").await.unwrap();
    manager.kill_session("never-existed").await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_kill_keeps_session_tracked() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager
        .create_session("work", TmuxOptions::default())
        .await
        .unwrap();
    std::fs::write(fake.root.path().join("kill-fails"), "").unwrap();

    let err = manager.kill_session("work").await.unwrap_err();
    assert!(matches!(err, TmuxError::CommandFailed { .. }));
    assert!(manager.session_exists("work").await);
    assert!(manager.get_session("work").is_some());

    // Cleanup retries the session once the server recovers.
    std::fs::remove_file(fake.root.path().join("kill-fails")).unwrap();
    manager.kill_all_sessions().await;

    assert_eq!(fake.count_calls("kill-session"), 2);
    assert!(!manager.session_exists("work").await);
    assert!(manager.get_session("work").is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_list_sessions() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    assert!(manager.list_sessions().await.is_empty());

    manager.create_session("a", TmuxOptions::default()).await.unwrap();
    fake.add_external_session("b");

    let mut names = manager.list_sessions().await;
    names.sort();
    assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_kill_all_sessions_only_touches_cached() {
    let fake = FakeTmux::new();
    let manager = fake.manager();
    manager.create_session("a", TmuxOptions::default()).await.unwrap();
    manager.create_session("b", TmuxOptions::default()).await.unwrap();
    fake.add_external_session("external");

    // One of the cached sessions disappears behind the manager's back.
    std::fs::remove_file(fake.state().join("b")).unwrap();

    manager.kill_all_sessions().await;

    assert_eq!(manager.list_sessions().await, vec!["external".to_string()]);
    assert!(manager.get_session("a").is_none());
    assert!(manager.get_session("b").is_none());
}

#[test]
fn test_default_program() {
    let manager = TmuxSessionManager::new(ProcessExecutor::default());
    assert_eq!(manager.program(), DEFAULT_TMUX_PROGRAM);
}
