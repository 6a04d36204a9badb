use super::*;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;

// Sets env vars for one test and removes them on drop.
struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    fn new() -> Self {
        Self { keys: Vec::new() }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.keys.push(key.to_string());
        // SAFETY: test-only, serialized with #[serial]
        unsafe { env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            // SAFETY: test-only, serialized with #[serial]
            unsafe { env::remove_var(key) };
        }
    }
}

#[test]
#[serial]
fn test_apply_without_env_keeps_config() {
    let mut config = ClimuxConfig::default();
    EnvLoader::new().apply(&mut config);
    assert_eq!(config, ClimuxConfig::default());
}

#[test]
#[serial]
fn test_apply_overrides_from_env() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_CLI_PATH, "/opt/claude/bin/claude");
    guard.set(ENV_MODEL, "claude-3-sonnet");
    guard.set(ENV_API_KEY, "sk-test");
    guard.set(ENV_API_URL, "https://api.example.com");
    guard.set(ENV_TIMEOUT_SECS, "42");
    guard.set(ENV_REQUIRE_APPROVAL, "yes");
    guard.set(ENV_TMUX_PROGRAM, "/usr/bin/tmux");
    guard.set(ENV_LOG_LEVEL, "debug");

    let mut config = ClimuxConfig::default();
    EnvLoader::new().apply(&mut config);

    assert_eq!(config.cli_path, "/opt/claude/bin/claude");
    assert_eq!(config.default_model.as_deref(), Some("claude-3-sonnet"));
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(config.executor.timeout_secs, 42);
    assert!(config.security.policy.require_approval_for_all_commands);
    assert_eq!(config.tmux.program, "/usr/bin/tmux");
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_unparseable_values_are_ignored() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_TIMEOUT_SECS, "soon");
    guard.set(ENV_REQUIRE_APPROVAL, "maybe");

    let mut config = ClimuxConfig::default();
    EnvLoader::new().apply(&mut config);

    assert_eq!(config.executor.timeout_secs, 300);
    assert!(!config.security.policy.require_approval_for_all_commands);
}

#[test]
#[serial]
fn test_bool_false_overrides_true() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_REQUIRE_APPROVAL, "FALSE");

    let mut config = ClimuxConfig::default();
    config.security.policy.require_approval_for_all_commands = true;
    EnvLoader::new().apply(&mut config);

    assert!(!config.security.policy.require_approval_for_all_commands);
}

#[test]
#[serial]
fn test_empty_value_is_unset() {
    let mut guard = EnvGuard::new();
    guard.set(ENV_CLI_PATH, "");

    let mut config = ClimuxConfig::default();
    EnvLoader::new().apply(&mut config);

    assert_eq!(config.cli_path, "claude");
}
