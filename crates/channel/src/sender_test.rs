//! Tests for the telemetry senders
//!
//! Network-facing tests run against a minimal local HTTP stub instead of a
//! mock crate, so the full reqwest path is exercised.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::envelope::Envelope;
use crate::error::ChannelError;
use crate::queue::TelemetryQueue;
use crate::sender::{
    AsynchronousSender, NullSender, SenderConfig, COMMAND_BUFFER, DEFAULT_MAX_BATCH_SIZE,
    DEFAULT_SEND_INTERVAL, DEFAULT_SEND_TIME,
};

fn item(n: usize) -> Envelope {
    Envelope::new("test-key", "event", json!({ "n": n }))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Minimal HTTP endpoint stub: answers every POST with 200 and forwards the
/// request body to the returned receiver.
async fn spawn_endpoint_stub() -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                let body = loop {
                    let n = match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => n,
                    };
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = find_headers_end(&buf) {
                        let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                        let content_length = headers
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        let body_start = pos + 4;
                        while buf.len() < body_start + content_length {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }
                        break String::from_utf8_lossy(
                            &buf[body_start..body_start + content_length],
                        )
                        .to_string();
                    }
                };
                let _ = tx.send(body);
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}/v2/track"), rx)
}

async fn recv_body(rx: &mut mpsc::UnboundedReceiver<String>) -> Value {
    let body = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("stub should receive a batch")
        .expect("stub channel open");
    serde_json::from_str(&body).expect("batch body should be JSON")
}

#[test]
fn test_default_config() {
    let config = SenderConfig::default();
    assert_eq!(config.endpoint, crate::endpoint::default_url());
    assert_eq!(config.send_interval, DEFAULT_SEND_INTERVAL);
    assert_eq!(config.send_time, DEFAULT_SEND_TIME);
    assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
}

#[test]
fn test_config_builders() {
    let config = SenderConfig::default()
        .with_endpoint("http://localhost:1234/track")
        .with_send_interval(Duration::from_secs(5))
        .with_send_time(Duration::from_secs(30))
        .with_max_batch_size(0);
    assert_eq!(config.endpoint, "http://localhost:1234/track");
    assert_eq!(config.send_interval, Duration::from_secs(5));
    // Batch size is clamped to at least one item
    assert_eq!(config.max_batch_size, 1);
}

#[tokio::test]
async fn test_handle_signals_never_block() {
    let queue = Arc::new(TelemetryQueue::new());
    let (_sender, handle) = AsynchronousSender::new(SenderConfig::default(), queue);

    // Without a running task the command buffer fills up
    for _ in 0..COMMAND_BUFFER {
        let _ = handle.flush();
    }
    let result = handle.flush();
    assert!(matches!(result, Err(ChannelError::CommandChannelFull)));
}

#[tokio::test]
async fn test_explicit_flush_delivers_batch() {
    let (url, mut rx) = spawn_endpoint_stub().await;
    let queue = Arc::new(TelemetryQueue::new());
    let config = SenderConfig::default()
        .with_endpoint(url)
        .with_send_interval(Duration::from_secs(3600))
        .with_send_time(Duration::from_secs(3600));
    let handle = AsynchronousSender::spawn(config, Arc::clone(&queue));

    queue.enqueue(item(0));
    queue.enqueue(item(1));
    handle.flush().unwrap();

    let batch = recv_body(&mut rx).await;
    let batch = batch.as_array().expect("body should be an array");
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0]["iKey"], "test-key");
    assert_eq!(batch[0]["data"]["n"], 0);
    assert_eq!(batch[1]["data"]["n"], 1);
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn test_periodic_flush_without_signal() {
    let (url, mut rx) = spawn_endpoint_stub().await;
    let queue = Arc::new(TelemetryQueue::new());
    let config = SenderConfig::default()
        .with_endpoint(url)
        .with_send_interval(Duration::from_millis(50))
        .with_send_time(Duration::from_millis(50));
    let _handle = AsynchronousSender::spawn(config, Arc::clone(&queue));

    queue.enqueue(item(42));

    // No explicit flush - the timer alone must deliver
    let batch = recv_body(&mut rx).await;
    assert_eq!(batch[0]["data"]["n"], 42);
}

#[tokio::test]
async fn test_flush_chunks_at_max_batch_size() {
    let (url, mut rx) = spawn_endpoint_stub().await;
    let queue = Arc::new(TelemetryQueue::new());
    let config = SenderConfig::default()
        .with_endpoint(url)
        .with_send_interval(Duration::from_secs(3600))
        .with_send_time(Duration::from_secs(3600))
        .with_max_batch_size(2);
    let handle = AsynchronousSender::spawn(config, Arc::clone(&queue));

    for n in 0..5 {
        queue.enqueue(item(n));
    }
    handle.flush().unwrap();

    let sizes = [
        recv_body(&mut rx).await.as_array().unwrap().len(),
        recv_body(&mut rx).await.as_array().unwrap().len(),
        recv_body(&mut rx).await.as_array().unwrap().len(),
    ];
    assert_eq!(sizes, [2, 2, 1]);
}

#[tokio::test]
async fn test_shutdown_drains_pending_items() {
    let (url, mut rx) = spawn_endpoint_stub().await;
    let queue = Arc::new(TelemetryQueue::new());
    let config = SenderConfig::default()
        .with_endpoint(url)
        .with_send_interval(Duration::from_secs(3600))
        .with_send_time(Duration::from_secs(3600));
    let (sender, handle) = AsynchronousSender::new(config, Arc::clone(&queue));
    let task = tokio::spawn(sender.run());

    queue.enqueue(item(7));
    handle.shutdown().unwrap();
    task.await.unwrap();

    let batch = recv_body(&mut rx).await;
    assert_eq!(batch[0]["data"]["n"], 7);
    assert_eq!(queue.len(), 0);
}

#[tokio::test]
async fn test_transmission_failure_drops_batch_and_keeps_running() {
    let queue = Arc::new(TelemetryQueue::new());
    // Nothing listens here - every transmission fails
    let config = SenderConfig::default()
        .with_endpoint("http://127.0.0.1:9/v2/track")
        .with_send_interval(Duration::from_secs(3600))
        .with_send_time(Duration::from_secs(3600));
    let (sender, handle) = AsynchronousSender::new(config, Arc::clone(&queue));
    let task = tokio::spawn(sender.run());

    queue.enqueue(item(0));
    handle.flush().unwrap();

    // The failed batch is dropped, not re-enqueued, and the task survives
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.len(), 0);
    assert!(!task.is_finished());

    handle.shutdown().unwrap();
    task.await.unwrap();
}

#[tokio::test]
async fn test_null_sender_discards() {
    let queue = Arc::new(TelemetryQueue::new());
    let sender = NullSender::new(Arc::clone(&queue));

    queue.enqueue(item(0));
    queue.enqueue(item(1));
    sender.flush();

    assert_eq!(queue.len(), 0);
}
