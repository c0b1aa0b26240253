//! Settings error types

use thiserror::Error;

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading raw settings
///
/// Resolution itself never fails - a missing or unusable key resolves to a
/// disabled (no-op) client downstream. These errors only surface when the
/// raw key/value input cannot be parsed at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML settings
    #[error("failed to parse settings: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Failed to parse JSON settings
    #[error("failed to parse settings: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// A key holds a value of the wrong shape
    #[error("invalid value for '{key}': {message}")]
    InvalidValue {
        /// Settings key name
        key: &'static str,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create an InvalidValue error
    pub fn invalid_value(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}
