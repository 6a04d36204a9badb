use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_lists() {
    let config = PolicyConfig::default();
    assert!(config.whitelisted_commands.contains(&"ls".to_string()));
    assert!(config.blacklisted_commands.contains(&"rm -rf /".to_string()));
    assert_eq!(config.whitelisted_patterns.len(), 3);
    assert_eq!(config.blacklisted_patterns.len(), 3);
    assert!(config.whitelisted_paths.contains(&"/tmp".to_string()));
    assert!(config.blacklisted_paths.contains(&"/etc".to_string()));
    assert!(!config.require_approval_for_all_commands);
    assert!(config.log_all_commands);
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config: PolicyConfig = serde_json::from_str(
        r#"{"whitelisted_commands": ["cargo"], "require_approval_for_all_commands": true}"#,
    )
    .unwrap();

    assert_eq!(config.whitelisted_commands, vec!["cargo".to_string()]);
    assert!(config.require_approval_for_all_commands);
    assert_eq!(
        config.blacklisted_commands,
        PolicyConfig::default().blacklisted_commands
    );
}
