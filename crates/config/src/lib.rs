//! Flare Settings
//!
//! Raw key/value settings loading and resolution into the immutable value
//! types the rest of the pipeline caches on. Minimal settings should just
//! work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse raw settings from TOML:
//!
//! ```
//! use flare_config::{RawSettings, Settings};
//! use std::str::FromStr;
//!
//! let raw = RawSettings::from_str("ikey = \"my-app-key\"").unwrap();
//! let settings = Settings::resolve(&raw, false);
//! assert_eq!(settings.instrumentation_key.as_deref(), Some("my-app-key"));
//! ```
//!
//! # Debug mode
//!
//! When the host application runs in debug mode, the `debug_ikey` and
//! `debug_endpoint` keys take precedence so development telemetry can be
//! routed away from the production tenant:
//!
//! ```toml
//! ikey = "prod-key"
//! debug_ikey = "dev-key"
//! endpoint = "https://collect.example.com/v2/track"
//! send_interval = "1s"
//! ```

mod error;
mod raw;
mod settings;

pub use error::{ConfigError, Result};
pub use raw::RawSettings;
pub use settings::{ChannelSettings, Settings};
