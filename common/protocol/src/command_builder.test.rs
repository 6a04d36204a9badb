use std::collections::BTreeMap;
use std::path::PathBuf;

use super::*;
use pretty_assertions::assert_eq;

fn argv(inv: &CommandInvocation) -> Vec<&str> {
    inv.argv().iter().map(String::as_str).collect()
}

#[test]
fn test_minimal_command() {
    let inv = CommandBuilder::default().build("hello", &ExecutionOptions::default());
    assert_eq!(argv(&inv), vec!["claude", "--", "hello"]);
    assert_eq!(inv.mode(), ExecutionMode::Direct);
}

#[test]
fn test_empty_prompt_has_no_separator() {
    let inv = CommandBuilder::new("/opt/claude").build("", &ExecutionOptions::default());
    assert_eq!(argv(&inv), vec!["/opt/claude"]);
}

#[test]
fn test_full_flag_order() {
    let opts = ExecutionOptions {
        model: Some("opus".to_string()),
        output_format: Some("json".to_string()),
        api_key: Some("k".to_string()),
        api_url: Some("https://api".to_string()),
        dangerously_skip_permissions: Some(true),
        continue_conversation: Some(true),
        verbose: Some(true),
        context_file: Some(PathBuf::from("/tmp/c.context")),
        history_file: Some(PathBuf::from("/tmp/c.history")),
        output_file: Some(PathBuf::from("/tmp/out")),
        max_tokens: Some(4096),
        temperature: Some(0.7),
        additional_flags: Some(vec!["--print".to_string()]),
        ..Default::default()
    };

    let inv = CommandBuilder::default().build("-x prompt", &opts);
    assert_eq!(
        argv(&inv),
        vec![
            "claude",
            "--model",
            "opus",
            "--output-format",
            "json",
            "--api-key",
            "k",
            "--api-url",
            "https://api",
            "--dangerously-skip-permissions",
            "--continue",
            "--verbose",
            "--context",
            "/tmp/c.context",
            "--history",
            "/tmp/c.history",
            "--output",
            "/tmp/out",
            "--max-tokens",
            "4096",
            "--temperature",
            "0.7",
            "--print",
            "--",
            "-x prompt",
        ]
    );
}

#[test]
fn test_false_switches_are_omitted() {
    let opts = ExecutionOptions {
        verbose: Some(false),
        continue_conversation: Some(false),
        ..Default::default()
    };
    let inv = CommandBuilder::default().build("hi", &opts);
    assert_eq!(argv(&inv), vec!["claude", "--", "hi"]);
}

#[test]
fn test_multiplexed_prefix() {
    let opts = ExecutionOptions {
        execution_mode: Some(ExecutionMode::Multiplexed),
        multiplexer: Some(MultiplexerOptions {
            session_name: Some("work".to_string()),
            window_name: Some("main".to_string()),
            detached: Some(true),
            log_file: None,
        }),
        ..Default::default()
    };

    let inv = CommandBuilder::default().build("hi", &opts);
    assert_eq!(
        argv(&inv),
        vec![
            "tmux",
            "new-session",
            "-s",
            "work",
            "-n",
            "main",
            "-d",
            "--",
            "claude",
            "--",
            "hi"
        ]
    );
    assert_eq!(inv.mode(), ExecutionMode::Multiplexed);
}

#[test]
fn test_multiplexed_without_sub_options() {
    let opts = ExecutionOptions {
        execution_mode: Some(ExecutionMode::Multiplexed),
        ..Default::default()
    };
    let inv = CommandBuilder::default()
        .with_multiplexer_program("/usr/local/bin/tmux")
        .build("hi", &opts);
    assert_eq!(
        argv(&inv),
        vec!["/usr/local/bin/tmux", "new-session", "--", "claude", "--", "hi"]
    );
}

#[test]
fn test_working_dir_and_env_carried() {
    let opts = ExecutionOptions {
        working_directory: Some(PathBuf::from("/srv/project")),
        environment_variables: Some(BTreeMap::from([(
            "ANTHROPIC_LOG".to_string(),
            "debug".to_string(),
        )])),
        ..Default::default()
    };
    let inv = CommandBuilder::default().build("hi", &opts);
    assert_eq!(inv.working_dir(), Some(std::path::Path::new("/srv/project")));
    assert_eq!(
        inv.env().get("ANTHROPIC_LOG").map(String::as_str),
        Some("debug")
    );
}
