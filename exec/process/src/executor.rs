//! Process executor with concurrent draining, timeouts, and bounded shutdown.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::ExitStatus;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;

use climux_protocol::CommandInvocation;
use climux_protocol::FAILED_EXIT_CODE;
use climux_protocol::ProcessOutcome;
use tokio::process::Child;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::ExecutorConfig;
use crate::OutputStream;
use crate::StreamEvent;
use crate::StreamExit;
use crate::drain;

/// Lines buffered per streaming invocation before the drains wait on the consumer.
const STREAM_CHANNEL_CAPACITY: usize = 256;

/// Extra time given to cancelled work to reap its children after shutdown forces it.
const FORCE_RECLAIM_GRACE: Duration = Duration::from_secs(2);

/// Exit codes for signal deaths follow the shell convention.
#[cfg(unix)]
const EXIT_CODE_SIGNAL_BASE: i32 = 128;

const SHUTDOWN_MESSAGE: &str = "Process executor is shut down";
const CANCELLED_MESSAGE: &str = "Process killed by executor shutdown";

/// Spawns and supervises external processes.
///
/// Cloning is cheap and every clone drives the same executor, so shutting
/// down one handle shuts down all of them.
#[derive(Clone)]
pub struct ProcessExecutor {
    timeout: Duration,
    output_join_timeout: Duration,
    shutdown_timeout: Duration,
    tracker: TaskTracker,
    cancel: CancellationToken,
    shut_down: Arc<AtomicBool>,
}

impl std::fmt::Debug for ProcessExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessExecutor")
            .field("timeout", &self.timeout)
            .field("output_join_timeout", &self.output_join_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("in_flight", &self.tracker.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(&ExecutorConfig::default())
    }
}

impl ProcessExecutor {
    pub fn new(config: &ExecutorConfig) -> Self {
        Self {
            timeout: config.timeout(),
            output_join_timeout: config.output_join_timeout(),
            shutdown_timeout: config.shutdown_timeout(),
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
            shut_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_output_join_timeout(mut self, timeout: Duration) -> Self {
        self.output_join_timeout = timeout;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Run `invocation` to completion.
    ///
    /// Both pipes are drained by their own task from the moment the child
    /// starts. If the child outlives the timeout it is killed and the
    /// outcome is flagged `timed_out` with exit code `-1`.
    pub async fn run(&self, invocation: &CommandInvocation) -> ProcessOutcome {
        if self.is_shut_down() {
            return ProcessOutcome::failed(SHUTDOWN_MESSAGE);
        }

        let mut child = match spawn_child(invocation) {
            Ok(child) => child,
            Err(e) => return spawn_failure(invocation, &e),
        };
        debug!(command = %invocation.display(), pid = ?child.id(), "Spawned process");

        let stdout = self.tracker.spawn(drain::capture(child.stdout.take()));
        let stderr = self.tracker.spawn(drain::capture(child.stderr.take()));

        let waited = tokio::select! {
            waited = tokio::time::timeout(self.timeout, child.wait()) => waited,
            _ = self.cancel.cancelled() => {
                kill_and_reap(&mut child).await;
                stdout.abort();
                stderr.abort();
                return ProcessOutcome::failed(CANCELLED_MESSAGE);
            }
        };

        match waited {
            Ok(Ok(status)) => {
                let (stdout, stderr) = self.join_output(stdout, stderr).await;
                let exit_code = exit_code(status);
                debug!(command = %invocation.display(), exit_code, "Process exited");
                ProcessOutcome::completed(exit_code, stdout, stderr)
            }
            Ok(Err(e)) => {
                kill_and_reap(&mut child).await;
                stdout.abort();
                stderr.abort();
                warn!(command = %invocation.display(), error = %e, "Failed to wait for process");
                ProcessOutcome::failed(format!("Process execution failed: {e}"))
            }
            Err(_) => {
                warn!(
                    command = %invocation.display(),
                    timeout = ?self.timeout,
                    "Process timed out, killing it"
                );
                kill_and_reap(&mut child).await;
                let (stdout, stderr) = self.join_output(stdout, stderr).await;
                ProcessOutcome::timed_out(stdout, stderr, &self.timeout_reason())
            }
        }
    }

    /// Start `invocation` in the background and return a handle to its outcome.
    pub fn run_async(&self, invocation: CommandInvocation) -> PendingOutcome {
        let executor = self.clone();
        let handle = self
            .tracker
            .spawn(async move { executor.run(&invocation).await });
        PendingOutcome { handle }
    }

    /// Run `invocation` and deliver its output line by line.
    ///
    /// The returned stream ends with a single [`StreamEvent::Exited`].
    pub fn run_streaming(&self, invocation: &CommandInvocation) -> OutputStream {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let stream = OutputStream::new(rx);

        if self.is_shut_down() {
            let _ = tx.try_send(StreamEvent::Stderr(SHUTDOWN_MESSAGE.to_string()));
            let _ = tx.try_send(failed_exit());
            return stream;
        }

        let mut child = match spawn_child(invocation) {
            Ok(child) => child,
            Err(e) => {
                let outcome = spawn_failure(invocation, &e);
                let _ = tx.try_send(StreamEvent::Stderr(outcome.stderr));
                let _ = tx.try_send(failed_exit());
                return stream;
            }
        };
        debug!(command = %invocation.display(), pid = ?child.id(), "Spawned streaming process");

        let stdout = self.tracker.spawn(drain::forward_lines(
            child.stdout.take(),
            tx.clone(),
            StreamEvent::Stdout,
        ));
        let stderr = self.tracker.spawn(drain::forward_lines(
            child.stderr.take(),
            tx.clone(),
            StreamEvent::Stderr,
        ));

        self.tracker.spawn(supervise_stream(
            self.clone(),
            child,
            stdout,
            stderr,
            tx,
            invocation.display(),
        ));

        stream
    }

    /// Stop accepting work and wait for in-flight runs.
    ///
    /// Waits up to the shutdown timeout, then kills whatever is still
    /// running. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.tracker.close();
        info!(in_flight = self.tracker.len(), "Shutting down process executor");

        if tokio::time::timeout(self.shutdown_timeout, self.tracker.wait())
            .await
            .is_ok()
        {
            return;
        }

        warn!(
            in_flight = self.tracker.len(),
            "Process work still running after shutdown timeout, killing it"
        );
        self.cancel.cancel();
        if tokio::time::timeout(FORCE_RECLAIM_GRACE, self.tracker.wait())
            .await
            .is_err()
        {
            warn!(in_flight = self.tracker.len(), "Abandoning unfinished process work");
        }
    }

    async fn join_output<T: Default>(
        &self,
        stdout: JoinHandle<T>,
        stderr: JoinHandle<T>,
    ) -> (T, T) {
        tokio::join!(
            drain::join_bounded(stdout, self.output_join_timeout, "stdout"),
            drain::join_bounded(stderr, self.output_join_timeout, "stderr"),
        )
    }

    fn timeout_reason(&self) -> String {
        format!("Process timed out after {:?}", self.timeout)
    }
}

/// Wait for a streamed child and report its exit as the final event.
///
/// Once the child is gone the drains get the output join timeout to finish.
/// Pipes held open past that, typically by a grandchild, are dropped so the
/// stream still ends with [`StreamEvent::Exited`].
async fn supervise_stream(
    executor: ProcessExecutor,
    mut child: Child,
    mut stdout: JoinHandle<()>,
    mut stderr: JoinHandle<()>,
    tx: mpsc::Sender<StreamEvent>,
    command: String,
) {
    let waited = tokio::select! {
        waited = tokio::time::timeout(executor.timeout, child.wait()) => waited,
        _ = tx.closed() => {
            debug!(command = %command, "Stream consumer dropped, killing process");
            kill_and_reap(&mut child).await;
            stdout.abort();
            stderr.abort();
            return;
        }
        _ = executor.cancel.cancelled() => {
            kill_and_reap(&mut child).await;
            stdout.abort();
            stderr.abort();
            let _ = tx.send(StreamEvent::Stderr(CANCELLED_MESSAGE.to_string())).await;
            let _ = tx.send(failed_exit()).await;
            return;
        }
    };

    let exit = match waited {
        Ok(Ok(status)) => StreamExit {
            exit_code: exit_code(status),
            timed_out: false,
        },
        Ok(Err(e)) => {
            warn!(command = %command, error = %e, "Failed to wait for process");
            kill_and_reap(&mut child).await;
            let _ = tx
                .send(StreamEvent::Stderr(format!("Process execution failed: {e}")))
                .await;
            StreamExit {
                exit_code: FAILED_EXIT_CODE,
                timed_out: false,
            }
        }
        Err(_) => {
            warn!(command = %command, timeout = ?executor.timeout, "Process timed out, killing it");
            kill_and_reap(&mut child).await;
            StreamExit {
                exit_code: FAILED_EXIT_CODE,
                timed_out: true,
            }
        }
    };

    let drained = tokio::select! {
        joined = tokio::time::timeout(executor.output_join_timeout, async {
            let _ = (&mut stdout).await;
            let _ = (&mut stderr).await;
        }) => Some(joined.is_ok()),
        _ = tx.closed() => None,
        _ = executor.cancel.cancelled() => None,
    };
    match drained {
        Some(true) => {}
        Some(false) => {
            warn!(
                command = %command,
                limit = ?executor.output_join_timeout,
                "Output pipes still open after process exit, dropping them"
            );
            stdout.abort();
            stderr.abort();
        }
        None => {
            stdout.abort();
            stderr.abort();
            return;
        }
    }

    if exit.timed_out {
        let _ = tx.send(StreamEvent::Stderr(executor.timeout_reason())).await;
    }
    debug!(command = %command, exit_code = exit.exit_code, "Streaming process finished");
    let _ = tx.send(StreamEvent::Exited(exit)).await;
}

/// Future returned by [`ProcessExecutor::run_async`].
#[derive(Debug)]
pub struct PendingOutcome {
    handle: JoinHandle<ProcessOutcome>,
}

impl Future for PendingOutcome {
    type Output = ProcessOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|joined| {
            joined.unwrap_or_else(|e| ProcessOutcome::failed(format!("Process execution failed: {e}")))
        })
    }
}

fn spawn_child(invocation: &CommandInvocation) -> io::Result<Child> {
    let Some(program) = invocation.program() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty argument vector",
        ));
    };

    let mut command = Command::new(program);
    command
        .args(invocation.args())
        .envs(invocation.env())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = invocation.working_dir() {
        command.current_dir(dir);
    }
    command.spawn()
}

fn spawn_failure(invocation: &CommandInvocation, err: &io::Error) -> ProcessOutcome {
    warn!(command = %invocation.display(), error = %err, "Failed to spawn process");
    ProcessOutcome::failed(format!("Process execution failed: {err}"))
}

async fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "Kill failed, process probably already exited");
    }
    if let Err(e) = child.wait().await {
        warn!(error = %e, "Failed to reap killed process");
    }
}

fn failed_exit() -> StreamEvent {
    StreamEvent::Exited(StreamExit {
        exit_code: FAILED_EXIT_CODE,
        timed_out: false,
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| EXIT_CODE_SIGNAL_BASE + sig))
        .unwrap_or(FAILED_EXIT_CODE)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(FAILED_EXIT_CODE)
}

#[cfg(test)]
#[path = "executor.test.rs"]
mod tests;
