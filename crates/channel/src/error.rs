//! Delivery pipeline error types.

use thiserror::Error;

/// Errors that can occur inside the delivery pipeline.
///
/// None of these cross the producer boundary: `track`/`write` never fail
/// observably. They exist for the internal seams (sender control channel,
/// HTTP transmission) and for logging.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Sender command channel is full (non-blocking signal failed)
    #[error("sender command channel full, signal dropped")]
    CommandChannelFull,

    /// Network error during batch transmission
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint returned an error status
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// Batch serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}
