//! Resolved settings value types
//!
//! `Settings` and `ChannelSettings` are the immutable, structurally
//! comparable values the client registry caches on. Two values with equal
//! fields are the same configuration - there are no identity semantics.

use std::time::Duration;

use crate::raw::RawSettings;

/// Fully resolved telemetry settings
///
/// Produced by [`Settings::resolve`] from raw key/value input. Usable as a
/// cache key: equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Settings {
    /// Instrumentation key routing telemetry to a logical application.
    /// `None` means telemetry is disabled; callers receive a no-op client.
    pub instrumentation_key: Option<String>,

    /// Record the operation URL on request telemetry
    pub use_operation_url: bool,

    /// Record handler arguments on request telemetry
    pub record_view_arguments: bool,

    /// Delivery pipeline settings
    pub channel: ChannelSettings,
}

/// Delivery pipeline settings
///
/// Absent fields mean "use the built-in default". The channel cache keys on
/// this value, so two producers with equal channel settings share one queue
/// and one background sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ChannelSettings {
    /// Flush cadence for the background sender
    pub send_interval: Option<Duration>,

    /// Maximum time a buffered item may wait before transmission
    pub send_time: Option<Duration>,

    /// Collection endpoint URL
    pub endpoint: Option<String>,
}

impl Settings {
    /// Resolve raw key/value settings into an immutable `Settings` value
    ///
    /// In debug mode the `debug_ikey` key is preferred, and the endpoint
    /// falls back from `debug_endpoint` to `endpoint`. Missing keys take
    /// their defaults: `use_operation_url` false, `record_view_arguments`
    /// true. Resolution never fails - an absent key means a no-op client
    /// downstream, not an error.
    pub fn resolve(raw: &RawSettings, debug: bool) -> Self {
        let (instrumentation_key, endpoint) = if debug {
            (
                raw.debug_ikey.clone(),
                raw.debug_endpoint.clone().or_else(|| raw.endpoint.clone()),
            )
        } else {
            (raw.ikey.clone(), raw.endpoint.clone())
        };

        Self {
            instrumentation_key,
            use_operation_url: raw.use_operation_url.unwrap_or(false),
            record_view_arguments: raw.record_view_arguments.unwrap_or(true),
            channel: ChannelSettings {
                send_interval: raw.send_interval,
                send_time: raw.send_time,
                endpoint,
            },
        }
    }

    /// Whether these settings carry an instrumentation key
    pub fn is_enabled(&self) -> bool {
        self.instrumentation_key.is_some()
    }
}

impl ChannelSettings {
    /// Set the flush cadence
    #[must_use]
    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = Some(interval);
        self
    }

    /// Set the maximum buffered-item age
    #[must_use]
    pub fn with_send_time(mut self, time: Duration) -> Self {
        self.send_time = Some(time);
        self
    }

    /// Set the collection endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}
