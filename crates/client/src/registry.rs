//! Process-wide client and channel registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use flare_channel::TelemetryChannel;
use flare_config::{ChannelSettings, Settings};

use crate::client::TelemetryClient;

/// Process-wide cache deduplicating clients and their delivery pipelines
///
/// Construct once at startup and share by `Arc` - the registry replaces
/// ambient globals with an explicit injected object. Two caches, keyed by
/// value equality: `Settings` → client and `ChannelSettings` → channel.
/// Both live behind one mutex, so lookup-or-create is atomic: concurrent
/// callers with equal settings observe exactly one channel and one
/// background sender. Entries live until process exit; there is no
/// eviction.
pub struct TelemetryRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    clients: HashMap<Settings, Arc<TelemetryClient>>,
    channels: HashMap<ChannelSettings, Arc<TelemetryChannel>>,
}

impl TelemetryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Look up or create the client for `settings`
    ///
    /// Settings without an instrumentation key yield a fresh no-op client
    /// on every call. Those are deliberately not cached: a later settings
    /// fix takes effect immediately instead of hitting a stale no-op entry.
    /// The channel for `settings.channel` is still resolved into the cache
    /// first, so it is warm the moment a key is configured.
    ///
    /// Must be called within a tokio runtime (channel construction spawns
    /// the background sender).
    pub fn client_for(&self, settings: &Settings) -> Arc<TelemetryClient> {
        let mut inner = self.inner.lock();

        if let Some(client) = inner.clients.get(settings) {
            return Arc::clone(client);
        }

        let channel = Self::channel_locked(&mut inner, &settings.channel);

        let Some(ikey) = settings.instrumentation_key.clone() else {
            debug!("no instrumentation key configured, handing out a no-op client");
            return Arc::new(TelemetryClient::noop());
        };

        let client = Arc::new(TelemetryClient::new(ikey, channel));
        inner.clients.insert(settings.clone(), Arc::clone(&client));
        client
    }

    /// Look up or create the delivery pipeline for `channel_settings`
    pub fn channel_for(&self, channel_settings: &ChannelSettings) -> Arc<TelemetryChannel> {
        let mut inner = self.inner.lock();
        Self::channel_locked(&mut inner, channel_settings)
    }

    fn channel_locked(
        inner: &mut RegistryInner,
        settings: &ChannelSettings,
    ) -> Arc<TelemetryChannel> {
        if let Some(channel) = inner.channels.get(settings) {
            return Arc::clone(channel);
        }

        debug!(endpoint = ?settings.endpoint, "launching telemetry channel");
        let channel = Arc::new(TelemetryChannel::launch(settings));
        inner.channels.insert(settings.clone(), Arc::clone(&channel));
        channel
    }

    /// Flush-and-stop every cached channel
    ///
    /// The final drain happens on the sender tasks; clients handed out
    /// earlier keep accepting records without error, but nothing further
    /// is delivered.
    pub fn shutdown(&self) {
        let inner = self.inner.lock();
        for channel in inner.channels.values() {
            channel.shutdown();
        }
    }

    /// Number of cached clients
    pub fn client_count(&self) -> usize {
        self.inner.lock().clients.len()
    }

    /// Number of cached channels
    pub fn channel_count(&self) -> usize {
        self.inner.lock().channels.len()
    }
}

impl Default for TelemetryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
