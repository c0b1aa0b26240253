//! Bounded telemetry queue.
//!
//! The producer/consumer seam of the pipeline: many producers enqueue, one
//! sender drains. The queue is bounded by `max_queue_length`; a full queue
//! applies backpressure for a bounded moment rather than growing or
//! silently losing data.
//!
//! # Overflow policy
//!
//! `enqueue` on a full queue blocks up to the enqueue timeout waiting for
//! the sender to drain. If capacity does not free up in time the item is
//! dropped, counted, and logged. Producers never see an error either way.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::warn;

use crate::envelope::Envelope;

/// Default maximum number of buffered envelopes
pub const DEFAULT_MAX_QUEUE_LENGTH: usize = 500;

/// Default time a producer waits for capacity before the item is dropped
pub const DEFAULT_ENQUEUE_TIMEOUT: Duration = Duration::from_millis(100);

/// Bounded FIFO buffer between producers and the sender
pub struct TelemetryQueue {
    inner: Mutex<QueueInner>,
    space: Condvar,
    max_len: usize,
    enqueue_timeout: Duration,
    dropped: AtomicU64,
}

struct QueueInner {
    items: VecDeque<Envelope>,
    /// Enqueue instant of the oldest resident item, for the batch-age bound
    oldest_enqueued: Option<Instant>,
}

impl TelemetryQueue {
    /// Create a queue with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_QUEUE_LENGTH)
    }

    /// Create a queue bounded at `max_len` items
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                items: VecDeque::new(),
                oldest_enqueued: None,
            }),
            space: Condvar::new(),
            max_len: max_len.max(1),
            enqueue_timeout: DEFAULT_ENQUEUE_TIMEOUT,
            dropped: AtomicU64::new(0),
        }
    }

    /// Set the backpressure timeout applied to producers on a full queue
    #[must_use]
    pub fn with_enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    /// Append an item, blocking up to the enqueue timeout if the queue is full
    ///
    /// On timeout the item is dropped and counted. Never returns an error.
    pub fn enqueue(&self, envelope: Envelope) {
        let mut inner = self.inner.lock();

        if inner.items.len() >= self.max_len {
            let deadline = Instant::now() + self.enqueue_timeout;
            while inner.items.len() >= self.max_len {
                if self.space.wait_until(&mut inner, deadline).timed_out() {
                    break;
                }
            }
            if inner.items.len() >= self.max_len {
                drop(inner);
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(
                    capacity = self.max_len,
                    "telemetry queue full, dropping item"
                );
                return;
            }
        }

        if inner.items.is_empty() {
            inner.oldest_enqueued = Some(Instant::now());
        }
        inner.items.push_back(envelope);
    }

    /// Atomically remove and return every queued item in insertion order
    ///
    /// Leaves the queue empty and wakes producers blocked on capacity.
    pub fn drain_all(&self) -> Vec<Envelope> {
        let mut inner = self.inner.lock();
        inner.oldest_enqueued = None;
        let items = Vec::from(std::mem::take(&mut inner.items));
        drop(inner);
        self.space.notify_all();
        items
    }

    /// Current number of buffered items
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elapsed time since the oldest resident item was enqueued
    pub fn oldest_age(&self) -> Option<Duration> {
        self.inner.lock().oldest_enqueued.map(|at| at.elapsed())
    }

    /// Items dropped after the backpressure timeout
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Maximum number of buffered items
    pub fn capacity(&self) -> usize {
        self.max_len
    }
}

impl Default for TelemetryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod tests;
