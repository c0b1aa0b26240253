//! Producer-facing telemetry client.

use std::sync::Arc;

use serde_json::Value;

use flare_channel::{Envelope, TelemetryChannel};

/// Instrumentation key carried by no-op clients
pub const PLACEHOLDER_IKEY: &str = "00000000-0000-0000-0000-000000000000";

/// Record name used by [`TelemetryClient::track`]
const DEFAULT_RECORD_NAME: &str = "Event";

/// Handle producers use to emit telemetry
///
/// Holds the application's instrumentation key and a shared reference to a
/// delivery channel. Tracking stamps each record and enqueues it; network
/// I/O happens on the channel's background sender, never on the caller.
pub struct TelemetryClient {
    ikey: String,
    channel: Arc<TelemetryChannel>,
}

impl TelemetryClient {
    /// Create a client bound to `channel`
    pub fn new(ikey: impl Into<String>, channel: Arc<TelemetryChannel>) -> Self {
        Self {
            ikey: ikey.into(),
            channel,
        }
    }

    /// Create a no-op client
    ///
    /// Fully functional - same interface, placeholder key, discarding
    /// channel. Construction never fails, so disabled telemetry is a
    /// transparent substitution rather than a null check at every call site.
    pub fn noop() -> Self {
        Self::new(PLACEHOLDER_IKEY, Arc::new(TelemetryChannel::null()))
    }

    /// Record a named event with an opaque payload
    ///
    /// Never fails and never blocks on network I/O; bounded only by the
    /// queue's backpressure policy.
    pub fn track_event(&self, name: impl Into<String>, payload: Value) {
        self.channel
            .write(Envelope::new(self.ikey.clone(), name, payload));
    }

    /// Record an unnamed payload
    pub fn track(&self, payload: Value) {
        self.track_event(DEFAULT_RECORD_NAME, payload);
    }

    /// Ask the channel to transmit whatever is buffered
    pub fn flush(&self) {
        self.channel.flush();
    }

    /// The key this client stamps on records
    pub fn instrumentation_key(&self) -> &str {
        &self.ikey
    }

    /// Whether this client discards everything (diagnostics only -
    /// producers should never branch on this)
    pub fn is_noop(&self) -> bool {
        self.channel.is_noop()
    }

    /// The client's delivery channel
    pub fn channel(&self) -> &Arc<TelemetryChannel> {
        &self.channel
    }
}
