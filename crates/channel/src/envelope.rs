//! Telemetry envelope.
//!
//! The unit buffered by the queue and shipped by the sender: an opaque
//! serializable payload stamped with the producing client's instrumentation
//! key and a UTC timestamp. The wire schema of the payload itself belongs
//! to the serializing caller, not to this crate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// A single telemetry record awaiting delivery
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Envelope {
    /// Instrumentation key stamped by the producing client
    #[serde(rename = "iKey")]
    pub ikey: String,

    /// Record name (event name or record kind)
    pub name: String,

    /// Wall-clock time the record was produced
    pub time: DateTime<Utc>,

    /// Opaque payload
    pub data: Value,
}

impl Envelope {
    /// Create an envelope stamped with the current time
    pub fn new(ikey: impl Into<String>, name: impl Into<String>, data: Value) -> Self {
        Self {
            ikey: ikey.into(),
            name: name.into(),
            time: Utc::now(),
            data,
        }
    }
}
