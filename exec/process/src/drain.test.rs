use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_decode_line_strips_terminators() {
    assert_eq!(decode_line(b"hello\n"), "hello");
    assert_eq!(decode_line(b"hello\r\n"), "hello");
    assert_eq!(decode_line(b"tail"), "tail");
    assert_eq!(decode_line(b"\n"), "");
}

#[test]
fn test_decode_line_is_lossy() {
    assert_eq!(decode_line(b"a\xffb\n"), "a\u{fffd}b");
}

#[tokio::test]
async fn test_capture_reads_everything() {
    let data: &[u8] = b"first\nsecond";
    assert_eq!(capture(Some(data)).await, "first\nsecond");
    assert_eq!(capture(None::<&[u8]>).await, "");
}

#[tokio::test]
async fn test_forward_lines() {
    let (tx, mut rx) = mpsc::channel(8);
    let data: &[u8] = b"one\ntwo\nthree";
    forward_lines(Some(data), tx, StreamEvent::Stdout).await;

    let mut lines = Vec::new();
    while let Some(event) = rx.recv().await {
        lines.push(event);
    }
    assert_eq!(
        lines,
        vec![
            StreamEvent::Stdout("one".to_string()),
            StreamEvent::Stdout("two".to_string()),
            StreamEvent::Stdout("three".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_forward_lines_stops_when_receiver_dropped() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let data: &[u8] = b"one\ntwo\n";
    // Returns instead of blocking on a full channel
    forward_lines(Some(data), tx, StreamEvent::Stderr).await;
}

#[tokio::test]
async fn test_join_bounded_times_out() {
    let handle = tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        "late".to_string()
    });
    let value = join_bounded(handle, Duration::from_millis(50), "stdout").await;
    assert_eq!(value, "");
}

#[tokio::test]
async fn test_join_bounded_returns_value() {
    let handle = tokio::spawn(async { "ready".to_string() });
    let value = join_bounded(handle, Duration::from_secs(5), "stdout").await;
    assert_eq!(value, "ready");
}
