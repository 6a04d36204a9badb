use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use climux_protocol::FAILED_EXIT_CODE;
use climux_protocol::ProcessOutcome;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

/// How a streamed process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamExit {
    pub exit_code: i32,
    pub timed_out: bool,
}

/// One item produced by [`ProcessExecutor::run_streaming`].
///
/// [`ProcessExecutor::run_streaming`]: crate::ProcessExecutor::run_streaming
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A stdout line without its terminator.
    Stdout(String),
    /// A stderr line without its terminator.
    Stderr(String),
    /// Always the last event.
    Exited(StreamExit),
}

/// Lazy, finite sequence of output lines for a single invocation.
///
/// Lines from the two pipes arrive in whatever order the drains produce
/// them. Dropping the stream kills the child and stops the drains.
#[derive(Debug)]
pub struct OutputStream {
    inner: ReceiverStream<StreamEvent>,
}

impl OutputStream {
    pub(crate) fn new(rx: mpsc::Receiver<StreamEvent>) -> Self {
        Self {
            inner: ReceiverStream::new(rx),
        }
    }

    /// Drive the stream to completion, handing every line to a callback.
    pub async fn for_each_line<O, E>(mut self, mut on_stdout: O, mut on_stderr: E) -> StreamExit
    where
        O: FnMut(&str),
        E: FnMut(&str),
    {
        while let Some(event) = self.inner.next().await {
            match event {
                StreamEvent::Stdout(line) => on_stdout(&line),
                StreamEvent::Stderr(line) => on_stderr(&line),
                StreamEvent::Exited(exit) => return exit,
            }
        }
        // Producer went away without reporting an exit
        StreamExit {
            exit_code: FAILED_EXIT_CODE,
            timed_out: false,
        }
    }

    /// Collect the whole stream into an outcome, one line per `\n`.
    pub async fn into_outcome(self) -> ProcessOutcome {
        let mut stdout = String::new();
        let mut stderr = String::new();
        let exit = self
            .for_each_line(
                |line| push_line(&mut stdout, line),
                |line| push_line(&mut stderr, line),
            )
            .await;
        ProcessOutcome {
            exit_code: exit.exit_code,
            stdout,
            stderr,
            timed_out: exit.timed_out,
        }
    }
}

fn push_line(buf: &mut String, line: &str) {
    buf.push_str(line);
    buf.push('\n');
}

impl Stream for OutputStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
