//! Flare Client Library
//!
//! The producer-facing surface of the Flare telemetry client:
//!
//! - [`TelemetryClient`] - accepts telemetry records, stamps them with the
//!   application's instrumentation key, and hands them to its channel
//! - [`TelemetryRegistry`] - process-wide cache deduplicating clients and
//!   their delivery pipelines across equal configurations
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::str::FromStr;
//! use std::sync::Arc;
//!
//! use flare_client::TelemetryRegistry;
//! use flare_config::{RawSettings, Settings};
//! use serde_json::json;
//!
//! # async fn example() {
//! // Resolve settings once, at startup
//! let raw = RawSettings::from_str("ikey = \"my-app-key\"").unwrap();
//! let settings = Settings::resolve(&raw, false);
//!
//! // One registry per process, shared by Arc
//! let registry = Arc::new(TelemetryRegistry::new());
//!
//! // Per request (or per producer context)
//! let client = registry.client_for(&settings);
//! client.track_event("page_view", json!({ "page": "/home" }));
//! # }
//! ```
//!
//! Tracking never fails and never blocks on network I/O. Settings without
//! an instrumentation key yield a fully functional no-op client, so callers
//! never branch on "is telemetry enabled".

mod client;
mod registry;

pub use client::{TelemetryClient, PLACEHOLDER_IKEY};
pub use registry::TelemetryRegistry;
