use super::*;
use climux_error::ErrorExt;
use climux_error::StatusCode;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn create_temp_config() -> (TempDir, ConfigLoader) {
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::from_path(temp_dir.path());
    (temp_dir, loader)
}

#[test]
fn test_default_config_dir() {
    let dir = default_config_dir();
    assert!(dir.ends_with(DEFAULT_CONFIG_DIR));
}

#[test]
fn test_missing_file_yields_defaults() {
    let loader = ConfigLoader::from_path("/nonexistent/climux");
    let config = loader.load().unwrap();
    assert_eq!(config, ClimuxConfig::default());
}

#[test]
fn test_empty_file_yields_defaults() {
    let (temp_dir, loader) = create_temp_config();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), "  \n").unwrap();

    let config = loader.load().unwrap();
    assert_eq!(config, ClimuxConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let (temp_dir, loader) = create_temp_config();
    let json = r#"{
        "cli_path": "/usr/local/bin/claude",
        "session": { "path_prefix": "agent" },
        "security": { "blacklisted_commands": ["dd"], "log_all_commands": false },
        "executor": { "timeout_secs": 60 }
    }"#;
    std::fs::write(temp_dir.path().join(CONFIG_FILE), json).unwrap();

    let config = loader.load().unwrap();
    assert_eq!(config.cli_path, "/usr/local/bin/claude");
    assert_eq!(config.session.path_prefix, "agent");
    assert!(config.session.persist_history);
    assert_eq!(config.security.policy.blacklisted_commands, vec!["dd".to_string()]);
    assert!(!config.security.policy.log_all_commands);
    assert!(config.security.enabled);
    assert!(!config.security.policy.whitelisted_commands.is_empty());
    assert_eq!(config.executor.timeout_secs, 60);
    assert_eq!(config.executor.shutdown_timeout_secs, 10);
    assert_eq!(config.tmux.program, "tmux");
}

#[test]
fn test_malformed_file_is_error() {
    let (temp_dir, loader) = create_temp_config();
    std::fs::write(temp_dir.path().join(CONFIG_FILE), "{ not json").unwrap();

    let err = loader.load().unwrap_err();
    assert!(matches!(err, ConfigError::JsonParse { .. }));
    assert_eq!(err.status_code(), StatusCode::InvalidJson);
    assert!(err.to_string().contains(CONFIG_FILE));
}

#[test]
fn test_load_file_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.json");
    std::fs::write(&path, r#"{ "verbose": true }"#).unwrap();

    let loader = ConfigLoader::from_path("/nonexistent/climux");
    let config = loader.load_file(&path).unwrap();
    assert!(config.verbose);
}

#[test]
fn test_ensure_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("climux");
    let loader = ConfigLoader::from_path(&config_path);

    assert!(!config_path.exists());
    loader.ensure_dir().unwrap();
    assert!(config_path.is_dir());
    assert_eq!(loader.config_file(), config_path.join(CONFIG_FILE));
}
