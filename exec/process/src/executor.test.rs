use std::time::Instant;

use super::*;
use pretty_assertions::assert_eq;
use tokio_stream::StreamExt;

fn sh(script: &str) -> CommandInvocation {
    CommandInvocation::new(["sh", "-c", script])
}

#[cfg(unix)]
fn pid_alive(pid: &str) -> bool {
    std::process::Command::new("kill")
        .args(["-0", pid])
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_captures_stdout() {
    let executor = ProcessExecutor::default();
    let outcome = executor.run(&CommandInvocation::new(["echo", "hello"])).await;

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, "hello\n");
    assert_eq!(outcome.stderr, "");
    assert!(!outcome.timed_out);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_captures_stderr_and_exit_code() {
    let executor = ProcessExecutor::default();
    let outcome = executor.run(&sh("echo out; echo err >&2; exit 3")).await;

    assert_eq!(outcome.exit_code, 3);
    assert_eq!(outcome.stdout, "out\n");
    assert_eq!(outcome.stderr, "err\n");
    assert!(!outcome.timed_out);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_large_output_on_both_pipes_does_not_deadlock() {
    // Well past the usual 64 KiB pipe buffer, written to stdout then stderr
    let script = "head -c 300000 /dev/zero | tr '\\0' a; head -c 300000 /dev/zero | tr '\\0' b >&2";
    let executor = ProcessExecutor::default();

    let outcome = tokio::time::timeout(Duration::from_secs(60), executor.run(&sh(script)))
        .await
        .expect("run should not hang");

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout.len(), 300_000);
    assert_eq!(outcome.stderr.len(), 300_000);
    assert!(outcome.stdout.chars().all(|c| c == 'a'));
    assert!(outcome.stderr.chars().all(|c| c == 'b'));
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_timeout_kills_process() {
    let executor = ProcessExecutor::default().with_timeout(Duration::from_secs(1));
    let start = Instant::now();
    let outcome = executor.run(&sh("echo $$; exec sleep 30")).await;

    assert!(start.elapsed() < Duration::from_secs(15));
    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, -1);
    assert_eq!(outcome.stderr, "Process timed out after 1s");

    let pid = outcome.stdout.trim();
    assert!(!pid.is_empty());
    assert!(!pid_alive(pid), "process {pid} should have been killed");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_timeout_keeps_captured_stderr() {
    let executor = ProcessExecutor::default().with_timeout(Duration::from_secs(1));
    let outcome = executor.run(&sh("echo partial >&2; exec sleep 30")).await;

    assert!(outcome.timed_out);
    assert_eq!(outcome.stderr, "partial\nProcess timed out after 1s");
}

#[tokio::test]
async fn test_run_spawn_failure_is_an_outcome() {
    let executor = ProcessExecutor::default();
    let outcome = executor
        .run(&CommandInvocation::new(["/nonexistent/climux-test-binary"]))
        .await;

    assert_eq!(outcome.exit_code, -1);
    assert!(!outcome.timed_out);
    assert!(outcome.stderr.starts_with("Process execution failed:"));
}

#[tokio::test]
async fn test_run_empty_argv_is_a_spawn_failure() {
    let executor = ProcessExecutor::default();
    let outcome = executor.run(&CommandInvocation::new(Vec::<String>::new())).await;

    assert_eq!(outcome.exit_code, -1);
    assert!(outcome.stderr.contains("empty argument vector"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_uses_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    let executor = ProcessExecutor::default();
    let outcome = executor
        .run(&CommandInvocation::new(["pwd", "-P"]).with_working_dir(dir.path()))
        .await;

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(
        std::path::PathBuf::from(outcome.stdout.trim()),
        dir.path().canonicalize().unwrap()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_merges_environment() {
    let executor = ProcessExecutor::default();
    let invocation =
        sh("echo \"$CLIMUX_TEST_VALUE:$PATH\"").with_env([("CLIMUX_TEST_VALUE", "set")]);
    let outcome = executor.run(&invocation).await;

    let line = outcome.stdout.trim();
    assert!(line.starts_with("set:"));
    // Inherited variables are still present
    assert!(line.len() > "set:".len());
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_signal_exit_code() {
    let executor = ProcessExecutor::default();
    let outcome = executor.run(&sh("kill -TERM $$")).await;

    assert_eq!(outcome.exit_code, 128 + 15);
    assert!(!outcome.timed_out);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_async() {
    let executor = ProcessExecutor::default();
    let first = executor.run_async(CommandInvocation::new(["echo", "one"]));
    let second = executor.run_async(CommandInvocation::new(["echo", "two"]));

    assert_eq!(second.await.stdout, "two\n");
    assert_eq!(first.await.stdout, "one\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_streaming_delivers_lines() {
    let executor = ProcessExecutor::default();
    let stream = executor.run_streaming(&sh("echo a; echo b >&2; echo c; printf tail"));

    let events: Vec<StreamEvent> = stream.collect().await;
    let stdout: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Stdout(line) => Some(line.as_str()),
            _ => None,
        })
        .collect();
    let stderr: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Stderr(line) => Some(line.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(stdout, vec!["a", "c", "tail"]);
    assert_eq!(stderr, vec!["b"]);
    assert_eq!(
        events.last(),
        Some(&StreamEvent::Exited(StreamExit {
            exit_code: 0,
            timed_out: false
        }))
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_streaming_callbacks() {
    let executor = ProcessExecutor::default();
    let mut out = Vec::new();
    let mut err = Vec::new();

    let exit = executor
        .run_streaming(&sh("echo x; echo y >&2; exit 4"))
        .for_each_line(|l| out.push(l.to_string()), |l| err.push(l.to_string()))
        .await;

    assert_eq!(out, vec!["x".to_string()]);
    assert_eq!(err, vec!["y".to_string()]);
    assert_eq!(exit.exit_code, 4);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_streaming_timeout() {
    let executor = ProcessExecutor::default().with_timeout(Duration::from_secs(1));
    let outcome = executor
        .run_streaming(&sh("echo started; exec sleep 30"))
        .into_outcome()
        .await;

    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, -1);
    assert_eq!(outcome.stdout, "started\n");
    assert_eq!(outcome.stderr, "Process timed out after 1s\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_streaming_timeout_with_grandchild_holding_pipes() {
    // Killing the shell leaves the background sleep with both pipes open
    let executor = ProcessExecutor::default()
        .with_timeout(Duration::from_secs(1))
        .with_output_join_timeout(Duration::from_millis(500));
    let start = Instant::now();
    let outcome = executor
        .run_streaming(&sh("echo started; sleep 8 & wait"))
        .into_outcome()
        .await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, -1);
    assert_eq!(outcome.stdout, "started\n");
    assert_eq!(outcome.stderr, "Process timed out after 1s\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_streaming_exit_with_grandchild_holding_pipes() {
    let executor =
        ProcessExecutor::default().with_output_join_timeout(Duration::from_millis(200));
    let start = Instant::now();
    let outcome = executor
        .run_streaming(&sh("sleep 8 & echo done"))
        .into_outcome()
        .await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(!outcome.timed_out);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, "done\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_dropping_stream_kills_process() {
    let executor = ProcessExecutor::default();
    let mut stream = executor.run_streaming(&sh("echo $$; exec sleep 30"));

    let pid = match stream.next().await {
        Some(StreamEvent::Stdout(line)) => line,
        other => panic!("expected pid line, got {other:?}"),
    };
    drop(stream);

    let deadline = Instant::now() + Duration::from_secs(10);
    while pid_alive(&pid) {
        assert!(Instant::now() < deadline, "process {pid} still running");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn test_run_streaming_spawn_failure() {
    let executor = ProcessExecutor::default();
    let outcome = executor
        .run_streaming(&CommandInvocation::new(["/nonexistent/climux-test-binary"]))
        .into_outcome()
        .await;

    assert_eq!(outcome.exit_code, -1);
    assert!(outcome.stderr.starts_with("Process execution failed:"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_output_join_timeout_degrades() {
    // The background sleep keeps stdout open after the shell exits
    let executor =
        ProcessExecutor::default().with_output_join_timeout(Duration::from_millis(200));
    let start = Instant::now();
    let outcome = executor.run(&sh("sleep 3 & echo done; echo err >&2")).await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(outcome.exit_code, 0);
    assert!(!outcome.timed_out);
}

#[tokio::test]
async fn test_shutdown_rejects_new_work() {
    let executor = ProcessExecutor::default();
    executor.shutdown().await;
    assert!(executor.is_shut_down());

    let outcome = executor.run(&CommandInvocation::new(["echo", "hi"])).await;
    assert_eq!(outcome.exit_code, -1);
    assert_eq!(outcome.stderr, "Process executor is shut down");

    // Second call is a no-op
    executor.shutdown().await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_shutdown_waits_for_in_flight_work() {
    let executor = ProcessExecutor::default();
    let pending = executor.run_async(sh("sleep 0.3; echo finished"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    executor.shutdown().await;

    let outcome = pending.await;
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(outcome.stdout, "finished\n");
}

#[cfg(unix)]
#[tokio::test]
async fn test_shutdown_forces_stragglers() {
    let executor = ProcessExecutor::default().with_shutdown_timeout(Duration::from_millis(200));
    let pending = executor.run_async(sh("exec sleep 30"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let start = Instant::now();
    executor.shutdown().await;
    assert!(start.elapsed() < Duration::from_secs(10));

    let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("pending run should be reclaimed");
    assert_eq!(outcome.exit_code, -1);
    assert!(!outcome.timed_out);
}

#[test]
fn test_config_defaults() {
    let config = ExecutorConfig::default();
    assert_eq!(config.timeout(), Duration::from_secs(300));
    assert_eq!(config.output_join_timeout(), Duration::from_secs(5));
    assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
    assert_eq!(ProcessExecutor::new(&config).timeout(), Duration::from_secs(300));
}
