use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_layout_uses_temp_dir() {
    let layout = SessionLayout::default();
    let tmp = std::env::temp_dir();
    assert_eq!(
        layout.history_file("abc"),
        tmp.join("claude-session-abc.history")
    );
    assert_eq!(
        layout.context_file("abc"),
        tmp.join("claude-session-abc.context")
    );
}

#[test]
fn test_layout_from_config() {
    let mut config = ClimuxConfig::default();
    config.session_directory = Some(PathBuf::from("/srv/sessions"));
    config.session.history_directory = Some(PathBuf::from("/srv/history"));
    config.session.path_prefix = "agent".to_string();
    config.session.persist_context = false;

    let layout = SessionLayout::from_config(&config);
    assert_eq!(
        layout.history_file("s1"),
        PathBuf::from("/srv/history/agent-s1.history")
    );
    assert_eq!(
        layout.context_file("s1"),
        PathBuf::from("/srv/sessions/agent-s1.context")
    );
    assert!(layout.persist_history);
    assert!(!layout.persist_context);
}
