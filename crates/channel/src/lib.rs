//! Flare delivery pipeline - buffered, asynchronous, non-blocking.
//!
//! This crate implements the path a telemetry record travels between the
//! producing client and the collection endpoint. Key principles:
//!
//! - **Non-blocking**: producers enqueue and return; network I/O happens
//!   only on the background sender task
//! - **Bounded**: the queue has a hard capacity with a backpressure policy,
//!   never unbounded growth
//! - **Best-effort**: a failed transmission is logged and dropped, nothing
//!   propagates to producers
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌─────────────────────┐
//! │   Producers  │────▶│  TelemetryQueue  │────▶│ AsynchronousSender  │
//! │ (any thread) │     │ (bounded, FIFO)  │     │ (background task)   │
//! └──────────────┘     └──────────────────┘     └─────────────────────┘
//!        │                      ▲                         │
//!        │ write()              │ drain_all()             │ HTTP POST
//!        ▼                      │                         ▼
//! ┌──────────────────────────────────────┐       ┌──────────────────┐
//! │          TelemetryChannel            │       │ collection       │
//! │  (one queue + one sender, cached)    │       │ endpoint         │
//! └──────────────────────────────────────┘       └──────────────────┘
//! ```
//!
//! The sender flushes on a time schedule (`send_interval`), on a max
//! batch-age bound (`send_time`), and early whenever the queue reaches a
//! full batch. The [`sender::NullSender`] variant drains and discards,
//! backing the no-op client so disabled telemetry is a transparent
//! substitution rather than a branch at every call site.

pub mod channel;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod queue;
pub mod sender;

pub use channel::TelemetryChannel;
pub use envelope::Envelope;
pub use error::ChannelError;
pub use queue::TelemetryQueue;
pub use sender::{AsynchronousSender, NullSender, SenderConfig, SenderHandle};
