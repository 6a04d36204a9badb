use super::*;
use climux_error::ErrorExt;
use climux_error::StatusCode;
use climux_protocol::CommandBuilder;
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = ClimuxConfig::default();
    assert_eq!(config.cli_path, "claude");
    assert_eq!(config.default_output_format.as_deref(), Some("text"));
    assert_eq!(config.default_max_tokens, None);
    assert_eq!(config.default_temperature, None);
    assert_eq!(config.session.path_prefix, "claude-session");
    assert_eq!(config.tmux.default_session_prefix, "claude-");
    assert!(config.tmux.auto_cleanup_on_shutdown);
    assert_eq!(config.logging.level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_options_from_properties() {
    let mut config = ClimuxConfig::default();
    config.api_key = Some("sk-1".to_string());
    config.verbose = true;
    config.default_max_tokens = Some(4096);
    config
        .default_environment_variables
        .insert("FOO".to_string(), "bar".to_string());

    let opts = config.default_options();
    assert_eq!(opts.model.as_deref(), Some(DEFAULT_MODEL));
    assert_eq!(opts.output_format.as_deref(), Some("text"));
    assert_eq!(opts.api_key.as_deref(), Some("sk-1"));
    assert_eq!(opts.verbose, Some(true));
    assert_eq!(opts.dangerously_skip_permissions, None);
    assert_eq!(opts.max_tokens, Some(4096));
    assert_eq!(opts.temperature, None);
    assert_eq!(
        opts.environment_variables
            .as_ref()
            .and_then(|env| env.get("FOO"))
            .map(String::as_str),
        Some("bar")
    );
    assert_eq!(opts.history_file, None);
}

#[test]
fn test_default_options_build_a_command() {
    let config = ClimuxConfig::default();
    let inv = CommandBuilder::new(config.cli_path.clone()).build("hi", &config.default_options());
    assert_eq!(
        inv.argv(),
        [
            "claude",
            "--model",
            DEFAULT_MODEL,
            "--output-format",
            "text",
            "--",
            "hi",
        ]
    );
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = ClimuxConfig::default();
    config.default_temperature = Some(3.5);
    let err = config.validate().unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    assert!(err.to_string().contains("default_temperature"));

    let mut config = ClimuxConfig::default();
    config.executor.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = ClimuxConfig::default();
    config.cli_path = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_session_dir_falls_back_to_temp() {
    let mut config = ClimuxConfig::default();
    assert_eq!(config.session_dir(), std::env::temp_dir());

    config.session_directory = Some(PathBuf::from("/var/lib/climux"));
    assert_eq!(config.session_dir(), PathBuf::from("/var/lib/climux"));
    assert_eq!(config.history_dir(), PathBuf::from("/var/lib/climux"));

    config.session.context_directory = Some(PathBuf::from("/srv/context"));
    assert_eq!(config.context_dir(), PathBuf::from("/srv/context"));
    assert_eq!(config.history_dir(), PathBuf::from("/var/lib/climux"));
}

#[test]
#[serial]
fn test_load_with_file_and_validation() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("climux.json");
    std::fs::write(&path, r#"{ "default_max_tokens": -1 }"#).unwrap();

    let loader = ConfigLoader::from_path(temp_dir.path());
    let err = ClimuxConfig::load_with(&loader, Some(&path)).unwrap_err();
    assert!(matches!(err, crate::ConfigError::InvalidValue { .. }));

    std::fs::write(&path, r#"{ "default_max_tokens": 1024 }"#).unwrap();
    let config = ClimuxConfig::load_with(&loader, Some(&path)).unwrap();
    assert_eq!(config.default_max_tokens, Some(1024));
}

#[test]
fn test_serde_round_trip_keeps_flattened_policy() {
    let config = ClimuxConfig::default();
    let json = serde_json::to_value(&config).unwrap();
    assert!(json["security"]["whitelisted_commands"].is_array());
    assert_eq!(json["security"]["enabled"], serde_json::json!(true));

    let back: ClimuxConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}
