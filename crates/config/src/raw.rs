//! Raw key/value settings
//!
//! `RawSettings` is the unresolved form handed in by the host application:
//! a flat mapping of well-known string keys to primitive values. Unknown
//! keys are ignored; missing keys fall back to documented defaults during
//! resolution.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Unresolved telemetry settings as supplied by the host application
///
/// All keys are optional. Durations accept either a plain number of seconds
/// (`send_interval = 0.5`) or a humantime string (`send_interval = "500ms"`).
///
/// # Example
///
/// ```toml
/// ikey = "prod-key"
/// debug_ikey = "dev-key"
/// endpoint = "https://collect.example.com/v2/track"
/// record_view_arguments = false
/// send_interval = "1s"
/// send_time = 3
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Production instrumentation key
    pub ikey: Option<String>,

    /// Instrumentation key used while the host runs in debug mode
    pub debug_ikey: Option<String>,

    /// Collection endpoint URL
    pub endpoint: Option<String>,

    /// Collection endpoint used in debug mode (falls back to `endpoint`)
    pub debug_endpoint: Option<String>,

    /// Record the operation URL on request telemetry
    /// Default: false
    pub use_operation_url: Option<bool>,

    /// Record handler arguments on request telemetry
    /// Default: true
    pub record_view_arguments: Option<bool>,

    /// Flush cadence for the background sender
    #[serde(deserialize_with = "duration_option")]
    pub send_interval: Option<Duration>,

    /// Maximum time a buffered item may wait before transmission
    #[serde(deserialize_with = "duration_option")]
    pub send_time: Option<Duration>,
}

impl RawSettings {
    /// Load raw settings from a JSON object (string keys to primitives)
    ///
    /// # Errors
    ///
    /// Returns error if the value is not an object or a known key holds a
    /// value of the wrong shape.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

impl FromStr for RawSettings {
    type Err = ConfigError;

    /// Parse raw settings from a TOML string
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// A duration given either as seconds or as a humantime string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Secs(u64),
    SecsFloat(f64),
    Human(String),
}

impl TryFrom<RawDuration> for Duration {
    type Error = String;

    fn try_from(raw: RawDuration) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawDuration::Secs(s) => Ok(Duration::from_secs(s)),
            RawDuration::SecsFloat(s) if s >= 0.0 && s.is_finite() => {
                Ok(Duration::from_secs_f64(s))
            }
            RawDuration::SecsFloat(s) => Err(format!("invalid duration: {s}")),
            RawDuration::Human(s) => humantime::parse_duration(&s).map_err(|e| e.to_string()),
        }
    }
}

fn duration_option<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<RawDuration>::deserialize(deserializer)?
        .map(Duration::try_from)
        .transpose()
        .map_err(serde::de::Error::custom)
}
