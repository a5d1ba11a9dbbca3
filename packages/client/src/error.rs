//! Error types for the Huddle CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The room id given on the command line cannot be joined
    #[error("Room id must not be empty")]
    InvalidRoomId,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Every reconnection attempt failed
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
