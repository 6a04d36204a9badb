//! Output drains. One drain task runs per pipe for the whole life of the
//! child so that neither pipe can fill up while the other is being read.

use std::time::Duration;

use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncReadExt;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::StreamEvent;

const READ_CHUNK_SIZE: usize = 4096;

/// Read `reader` to EOF and decode it lossily.
pub(crate) async fn capture<R>(reader: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return String::new();
    };

    let mut buf = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Forward `reader` line by line into `tx`.
///
/// Stops at EOF or once the receiving side is gone. A final line without a
/// trailing newline is still delivered.
pub(crate) async fn forward_lines<R>(
    reader: Option<R>,
    tx: mpsc::Sender<StreamEvent>,
    wrap: fn(String) -> StreamEvent,
) where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return;
    };

    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(wrap(decode_line(&line))).await.is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Wait for a drain with an upper bound.
///
/// A drain still running at the deadline is aborted and its output is
/// dropped; the caller gets `T::default()` instead of hanging.
pub(crate) async fn join_bounded<T: Default>(
    mut handle: JoinHandle<T>,
    limit: Duration,
    stream: &'static str,
) -> T {
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!(stream, error = %e, "Output drain task failed");
            T::default()
        }
        Err(_) => {
            handle.abort();
            warn!(stream, ?limit, "Output drain did not finish in time, dropping it");
            T::default()
        }
    }
}

#[cfg(test)]
#[path = "drain.test.rs"]
mod tests;
