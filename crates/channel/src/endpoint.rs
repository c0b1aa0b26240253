//! Collection endpoint configuration.
//!
//! Centralized static configuration for the default telemetry collection
//! endpoint. Channel settings may override the URL per channel.

/// Default collection service host
pub const COLLECTION_HOST: &str = "dc.services.visualstudio.com";

/// Default collection path
pub const COLLECTION_PATH: &str = "/v2/track";

/// Get the default collection endpoint URL
#[inline]
pub fn default_url() -> String {
    format!("https://{COLLECTION_HOST}{COLLECTION_PATH}")
}
