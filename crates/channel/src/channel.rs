//! Telemetry channel - one queue paired with the sender that drains it.
//!
//! The channel is the unit the registry caches per distinct
//! [`ChannelSettings`] value: producers sharing equal settings share one
//! queue and one background sender.

use std::sync::Arc;

use flare_config::ChannelSettings;

use crate::envelope::Envelope;
use crate::queue::TelemetryQueue;
use crate::sender::{AsynchronousSender, NullSender, SenderConfig, SenderHandle};

/// One delivery pipeline: a bounded queue plus its sender
pub struct TelemetryChannel {
    queue: Arc<TelemetryQueue>,
    sender: ChannelSender,
    max_batch_size: usize,
}

enum ChannelSender {
    /// Background task delivering to the collection endpoint
    Background(SenderHandle),
    /// Inline drain-and-discard, for no-op clients
    Null(NullSender),
}

impl TelemetryChannel {
    /// Build the pipeline for `settings` and spawn its background sender
    ///
    /// An absent endpoint means the built-in collection endpoint;
    /// `send_interval`/`send_time` override the sender defaults when
    /// present. Must be called within a tokio runtime.
    pub fn launch(settings: &ChannelSettings) -> Self {
        let mut config = SenderConfig::default();
        if let Some(endpoint) = &settings.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(interval) = settings.send_interval {
            config.send_interval = interval;
        }
        if let Some(time) = settings.send_time {
            config.send_time = time;
        }
        Self::launch_with_config(config)
    }

    /// Build the pipeline from explicit sender parameters
    pub fn launch_with_config(config: SenderConfig) -> Self {
        let queue = Arc::new(TelemetryQueue::new());
        let max_batch_size = config.max_batch_size;
        let handle = AsynchronousSender::spawn(config, Arc::clone(&queue));
        Self {
            queue,
            sender: ChannelSender::Background(handle),
            max_batch_size,
        }
    }

    /// Build the discarding pipeline used by no-op clients
    ///
    /// Spawns nothing; items are dropped on write.
    pub fn null() -> Self {
        let queue = Arc::new(TelemetryQueue::new());
        let sender = NullSender::new(Arc::clone(&queue));
        Self {
            queue,
            sender: ChannelSender::Null(sender),
            max_batch_size: crate::sender::DEFAULT_MAX_BATCH_SIZE,
        }
    }

    /// Buffer one envelope
    ///
    /// Wakes the sender early once a full batch is queued. Never fails;
    /// bounded only by the queue's backpressure policy.
    pub fn write(&self, envelope: Envelope) {
        self.queue.enqueue(envelope);
        match &self.sender {
            ChannelSender::Background(handle) => {
                if self.queue.len() >= self.max_batch_size {
                    // A full command buffer means a flush is already pending
                    let _ = handle.flush();
                }
            }
            ChannelSender::Null(sender) => sender.flush(),
        }
    }

    /// Ask the sender to transmit whatever is buffered
    pub fn flush(&self) {
        match &self.sender {
            ChannelSender::Background(handle) => {
                let _ = handle.flush();
            }
            ChannelSender::Null(sender) => sender.flush(),
        }
    }

    /// Stop the background sender after a final drain
    ///
    /// Writes after shutdown still land in the queue but are no longer
    /// delivered; producers observe no error.
    pub fn shutdown(&self) {
        match &self.sender {
            ChannelSender::Background(handle) => {
                let _ = handle.shutdown();
            }
            ChannelSender::Null(sender) => sender.flush(),
        }
    }

    /// Whether this channel discards everything
    pub fn is_noop(&self) -> bool {
        matches!(self.sender, ChannelSender::Null(_))
    }

    /// The channel's queue, for diagnostics
    pub fn queue(&self) -> &TelemetryQueue {
        &self.queue
    }
}

#[cfg(test)]
#[path = "channel_test.rs"]
mod tests;
