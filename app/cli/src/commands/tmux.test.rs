use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_session_name_prefix() {
    let settings = TmuxSettings::default();
    assert_eq!(session_name(&settings, "work"), "claude-work");
    assert_eq!(session_name(&settings, "claude-work"), "claude-work");
}

#[tokio::test]
async fn test_disabled_tmux_is_an_error() {
    let mut config = ClimuxConfig::default();
    config.tmux.enabled = false;

    let err = run(&config, TmuxCommand::List).await.unwrap_err();
    assert!(err.to_string().contains("disabled"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_cleans_up_adopted_session() {
    // `true` reports every session as existing and every command as done.
    let manager = TmuxSessionManager::new(ProcessExecutor::default()).with_program("true");
    let settings = TmuxSettings::default();

    dispatch(
        &settings,
        &manager,
        TmuxCommand::Exec {
            name: "work".to_string(),
            text: "ls".to_string(),
            settle_ms: 0,
            keep: false,
        },
    )
    .await
    .unwrap();

    assert!(manager.get_session("claude-work").is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_cleans_up_when_send_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let program = dir.path().join("tmux");
    std::fs::write(
        &program,
        "#!/bin/sh\ncase \"$1\" in send-keys) echo \"send failed\" >&2; exit 1 ;; esac\nexit 0\n",
    )
    .unwrap();
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    let manager = TmuxSessionManager::new(ProcessExecutor::default())
        .with_program(program.display().to_string());
    let settings = TmuxSettings::default();

    let err = dispatch(
        &settings,
        &manager,
        TmuxCommand::Exec {
            name: "work".to_string(),
            text: "ls".to_string(),
            settle_ms: 0,
            keep: false,
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("send-keys"));
    assert!(manager.get_session("claude-work").is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_exec_keep_leaves_session() {
    let manager = TmuxSessionManager::new(ProcessExecutor::default()).with_program("true");
    let settings = TmuxSettings::default();

    dispatch(
        &settings,
        &manager,
        TmuxCommand::Exec {
            name: "work".to_string(),
            text: "ls".to_string(),
            settle_ms: 0,
            keep: true,
        },
    )
    .await
    .unwrap();

    assert!(manager.get_session("claude-work").is_some());
}
