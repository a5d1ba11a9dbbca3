//! Domain errors.

use thiserror::Error;

/// Validation failures when building value objects from client input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Room ids must contain at least one character
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// Connection ids are UUIDs issued by the relay
    #[error("'{0}' is not a valid connection id")]
    InvalidConnectionId(String),

    /// Opaque payloads must still be well-formed JSON
    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(String),
}
