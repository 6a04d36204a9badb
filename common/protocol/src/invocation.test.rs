use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_program_and_args() {
    let inv = CommandInvocation::new(["tmux", "has-session", "-t", "work"]);
    assert_eq!(inv.program(), Some("tmux"));
    assert_eq!(inv.args(), ["has-session", "-t", "work"]);
    assert_eq!(inv.display(), "tmux has-session -t work");
    assert_eq!(inv.mode(), ExecutionMode::Direct);
}

#[test]
fn test_empty_argv() {
    let inv = CommandInvocation::new(Vec::<String>::new());
    assert_eq!(inv.program(), None);
    assert!(inv.args().is_empty());
}

#[test]
fn test_env_accumulates() {
    let inv = CommandInvocation::new(["env"])
        .with_env([("A", "1")])
        .with_env([("B", "2"), ("A", "3")])
        .with_working_dir("/tmp");

    assert_eq!(inv.env().get("A").map(String::as_str), Some("3"));
    assert_eq!(inv.env().get("B").map(String::as_str), Some("2"));
    assert_eq!(inv.working_dir(), Some(Path::new("/tmp")));
}
