//! Telemetry senders - drain the queue and deliver batches.
//!
//! Two variants, chosen at channel construction:
//!
//! - [`AsynchronousSender`] runs on a dedicated background task for the
//!   process lifetime, woken by its own timer plus an explicit flush signal.
//!   Producers never wait on network I/O.
//! - [`NullSender`] drains and discards. It backs the no-op channel, so a
//!   disabled client behaves identically to a real one except that data
//!   goes nowhere.
//!
//! Delivery is best-effort: a failed transmission is logged and the batch
//! is dropped. Retry policy is deliberately out of scope.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::endpoint;
use crate::envelope::Envelope;
use crate::error::ChannelError;
use crate::queue::TelemetryQueue;

/// Command channel depth - small since flush signals coalesce
const COMMAND_BUFFER: usize = 8;

/// HTTP request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Floor for the internal tick period
const MIN_TICK: Duration = Duration::from_millis(10);

/// Default flush cadence
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(1);

/// Default bound on how long a buffered item may wait
pub const DEFAULT_SEND_TIME: Duration = Duration::from_secs(3);

/// Default maximum number of envelopes per POST
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// Scheduling and delivery parameters for the asynchronous sender
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Collection endpoint URL
    pub endpoint: String,

    /// Flush cadence
    pub send_interval: Duration,

    /// Maximum time a buffered item may wait before transmission
    pub send_time: Duration,

    /// Maximum envelopes per POST; also the early-flush threshold
    pub max_batch_size: usize,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoint::default_url(),
            send_interval: DEFAULT_SEND_INTERVAL,
            send_time: DEFAULT_SEND_TIME,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

impl SenderConfig {
    /// Set the collection endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the flush cadence
    #[must_use]
    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    /// Set the maximum buffered-item age
    #[must_use]
    pub fn with_send_time(mut self, time: Duration) -> Self {
        self.send_time = time;
        self
    }

    /// Set the per-POST batch size
    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size.max(1);
        self
    }
}

/// Commands sent to the sender task
enum SenderCommand {
    Flush,
    Shutdown,
}

/// Handle for nudging the background sender.
///
/// Cheap to clone and safe to call from any thread. Signals are
/// fire-and-forget: a full command channel means a flush is already
/// pending, so dropping the signal loses nothing.
#[derive(Clone)]
pub struct SenderHandle {
    tx: mpsc::Sender<SenderCommand>,
}

impl SenderHandle {
    /// Request an immediate flush (non-blocking)
    pub fn flush(&self) -> Result<(), ChannelError> {
        self.tx
            .try_send(SenderCommand::Flush)
            .map_err(|_| ChannelError::CommandChannelFull)
    }

    /// Stop the sender after a final drain-and-send
    pub fn shutdown(&self) -> Result<(), ChannelError> {
        self.tx
            .try_send(SenderCommand::Shutdown)
            .map_err(|_| ChannelError::CommandChannelFull)
    }
}

/// Background worker draining the queue to the collection endpoint
pub struct AsynchronousSender {
    config: SenderConfig,
    queue: Arc<TelemetryQueue>,
    rx: mpsc::Receiver<SenderCommand>,
    http: reqwest::Client,
    last_send: Instant,
}

impl AsynchronousSender {
    /// Create a sender and its control handle
    ///
    /// The sender must be spawned as a task via [`run`](Self::run).
    pub fn new(config: SenderConfig, queue: Arc<TelemetryQueue>) -> (Self, SenderHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        let sender = Self {
            config,
            queue,
            rx,
            http,
            last_send: Instant::now(),
        };

        (sender, SenderHandle { tx })
    }

    /// Spawn the sender on the current tokio runtime
    ///
    /// Returns the control handle. The task runs until shutdown is
    /// requested or every handle is dropped.
    pub fn spawn(config: SenderConfig, queue: Arc<TelemetryQueue>) -> SenderHandle {
        let (sender, handle) = Self::new(config, queue);
        tokio::spawn(sender.run());
        handle
    }

    /// Run the sender loop.
    ///
    /// Ticks at `min(send_interval, send_time)` so the batch-age bound is
    /// honored even when the flush cadence is long. Shutdown (or the last
    /// handle dropping) triggers a final drain before the task exits.
    pub async fn run(mut self) {
        debug!(
            endpoint = %self.config.endpoint,
            interval_ms = self.config.send_interval.as_millis() as u64,
            send_time_ms = self.config.send_time.as_millis() as u64,
            batch = self.config.max_batch_size,
            "telemetry sender started"
        );

        let tick = self
            .config
            .send_interval
            .min(self.config.send_time)
            .max(MIN_TICK);
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if self.due() {
                        self.flush_queue().await;
                    }
                }
                cmd = self.rx.recv() => {
                    match cmd {
                        Some(SenderCommand::Flush) => {
                            self.flush_queue().await;
                        }
                        Some(SenderCommand::Shutdown) | None => {
                            debug!("telemetry sender shutting down");
                            self.flush_queue().await;
                            break;
                        }
                    }
                }
            }
        }
    }

    /// A wake triggers a send when the flush cadence has elapsed or the
    /// oldest buffered item exceeds the batch-age bound.
    fn due(&self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        if self.last_send.elapsed() >= self.config.send_interval {
            return true;
        }
        matches!(self.queue.oldest_age(), Some(age) if age >= self.config.send_time)
    }

    /// Drain the queue and transmit everything, in batch-size chunks
    async fn flush_queue(&mut self) {
        let items = self.queue.drain_all();
        self.last_send = Instant::now();
        if items.is_empty() {
            return;
        }

        trace!(count = items.len(), "flushing telemetry");
        for chunk in items.chunks(self.config.max_batch_size) {
            if let Err(e) = self.transmit(chunk).await {
                // Best-effort: the batch is gone, no re-enqueue
                warn!(
                    error = %e,
                    count = chunk.len(),
                    endpoint = %self.config.endpoint,
                    "failed to deliver telemetry batch, dropping"
                );
            }
        }
    }

    /// POST one batch to the endpoint
    async fn transmit(&self, batch: &[Envelope]) -> Result<(), ChannelError> {
        let response = self
            .http
            .post(&self.config.endpoint)
            .json(batch)
            .send()
            .await
            .map_err(|e| ChannelError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ChannelError::Server(response.status().as_u16()))
        }
    }
}

/// Sender that drains and discards.
///
/// Backs the no-op channel. Spawns no task, so throwaway no-op clients
/// cost nothing beyond their queue allocation.
pub struct NullSender {
    queue: Arc<TelemetryQueue>,
}

impl NullSender {
    /// Create a null sender over `queue`
    pub fn new(queue: Arc<TelemetryQueue>) -> Self {
        Self { queue }
    }

    /// Drain the queue and discard everything
    pub fn flush(&self) {
        let discarded = self.queue.drain_all();
        if !discarded.is_empty() {
            trace!(count = discarded.len(), "null sender discarded telemetry");
        }
    }
}

#[cfg(test)]
#[path = "sender_test.rs"]
mod tests;
