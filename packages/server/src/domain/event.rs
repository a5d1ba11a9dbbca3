//! Events the relay delivers to clients.

use super::{
    entity::{ChatMessage, Participant},
    value_object::{ConnectionId, OpaquePayload},
};

/// Server-to-client event, independent of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Sent to a joiner only: who was already in the room
    ExistingParticipants {
        participants: Vec<Participant>,
        self_id: ConnectionId,
    },
    /// Sent to everyone already in the room when someone joins
    NewParticipant(Participant),
    /// Sent to the remaining members when someone leaves
    ParticipantLeft { id: ConnectionId },
    /// Negotiation payload addressed to one member
    Signal {
        from: ConnectionId,
        signal: OpaquePayload,
    },
    /// Chat message, delivered to the whole room including its sender
    NewMessage(ChatMessage),
    /// Media state of a member, delivered to everyone else
    ParticipantStateChanged {
        participant_id: ConnectionId,
        state: OpaquePayload,
    },
}
