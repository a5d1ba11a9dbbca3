//! WebSocket message DTOs.
//!
//! Every frame is a JSON object `{ "type": ..., "payload": ... }`. Frames are
//! decoded in two steps: the envelope first, keeping `payload` as raw JSON,
//! then the payload for the announced type. Opaque values (`signal`, `state`)
//! stay raw the whole way so they are relayed byte-for-byte.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;
use thiserror::Error;

// ========================================
// Client → Server
// ========================================

/// Verbs a client may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessageType {
    JoinRoom,
    Signal,
    SendMessage,
    StateChange,
    LeaveRoom,
}

/// Raw inbound envelope
#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    r#type: ClientMessageType,
    #[serde(default)]
    payload: Option<Box<RawValue>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    pub room_id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPayload {
    pub to: String,
    pub signal: Box<RawValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub text: String,
}

/// STATE_CHANGE payload in either of its two shapes:
///
/// - canonical: `{ "state": <any JSON> }`
/// - legacy: `{ "type": "audio" | "video", "status": <any JSON> }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateChangePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Box<RawValue>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Box<RawValue>>,
}

impl StateChangePayload {
    /// Canonical state value to broadcast.
    ///
    /// The canonical shape is forwarded verbatim; the legacy shape becomes
    /// `{ "<type>": <status> }`.
    pub fn into_state(self) -> Result<Box<RawValue>, ProtocolError> {
        if let Some(state) = self.state {
            return Ok(state);
        }
        match (self.kind, self.status) {
            (Some(kind), Some(status)) => {
                let key = serde_json::to_string(&kind).map_err(ProtocolError::InvalidJson)?;
                RawValue::from_string(format!("{{{}:{}}}", key, status.get()))
                    .map_err(ProtocolError::InvalidJson)
            }
            _ => Err(ProtocolError::MalformedStateChange),
        }
    }
}

/// A decoded client frame
#[derive(Debug, Clone)]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    Signal(SignalPayload),
    SendMessage(SendMessagePayload),
    StateChange(StateChangePayload),
    LeaveRoom,
}

/// Reasons a frame is ignored
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid frame: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("{0:?} frame without payload")]
    MissingPayload(ClientMessageType),

    #[error("invalid {kind:?} payload: {source}")]
    InvalidPayload {
        kind: ClientMessageType,
        #[source]
        source: serde_json::Error,
    },

    #[error("STATE_CHANGE needs either `state` or both `type` and `status`")]
    MalformedStateChange,
}

impl ClientMessage {
    /// Decode one text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let envelope: ClientEnvelope =
            serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
        let kind = envelope.r#type;

        if kind == ClientMessageType::LeaveRoom {
            return Ok(Self::LeaveRoom);
        }

        let payload = envelope
            .payload
            .ok_or(ProtocolError::MissingPayload(kind))?;
        match kind {
            ClientMessageType::JoinRoom => decode_payload(kind, &payload).map(Self::JoinRoom),
            ClientMessageType::Signal => decode_payload(kind, &payload).map(Self::Signal),
            ClientMessageType::SendMessage => {
                decode_payload(kind, &payload).map(Self::SendMessage)
            }
            ClientMessageType::StateChange => {
                decode_payload(kind, &payload).map(Self::StateChange)
            }
            ClientMessageType::LeaveRoom => Ok(Self::LeaveRoom),
        }
    }
}

fn decode_payload<T: DeserializeOwned>(
    kind: ClientMessageType,
    payload: &RawValue,
) -> Result<T, ProtocolError> {
    serde_json::from_str(payload.get())
        .map_err(|source| ProtocolError::InvalidPayload { kind, source })
}

// ========================================
// Server → Client
// ========================================

/// Verbs the relay sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessageType {
    ExistingParticipants,
    NewParticipant,
    ParticipantLeft,
    Signal,
    NewMessage,
    ParticipantStateChanged,
}

/// Outbound envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEnvelope<P> {
    pub r#type: ServerMessageType,
    pub payload: P,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingParticipantsPayload {
    pub participants: Vec<ParticipantInfo>,
    pub self_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLeftPayload {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayedSignalPayload {
    pub from: String,
    pub signal: Box<RawValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStateChangedPayload {
    pub participant_id: String,
    pub state: Box<RawValue>,
}

/// A decoded server frame (used by clients)
#[derive(Debug, Clone)]
pub enum ServerMessage {
    ExistingParticipants(ExistingParticipantsPayload),
    NewParticipant(ParticipantInfo),
    ParticipantLeft(ParticipantLeftPayload),
    Signal(RelayedSignalPayload),
    NewMessage(NewMessagePayload),
    ParticipantStateChanged(ParticipantStateChangedPayload),
}

impl ServerMessage {
    /// Decode one text frame sent by the relay.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let envelope: ServerEnvelope<Box<RawValue>> = serde_json::from_str(text)?;
        let payload = envelope.payload.get();
        Ok(match envelope.r#type {
            ServerMessageType::ExistingParticipants => {
                Self::ExistingParticipants(serde_json::from_str(payload)?)
            }
            ServerMessageType::NewParticipant => Self::NewParticipant(serde_json::from_str(payload)?),
            ServerMessageType::ParticipantLeft => {
                Self::ParticipantLeft(serde_json::from_str(payload)?)
            }
            ServerMessageType::Signal => Self::Signal(serde_json::from_str(payload)?),
            ServerMessageType::NewMessage => Self::NewMessage(serde_json::from_str(payload)?),
            ServerMessageType::ParticipantStateChanged => {
                Self::ParticipantStateChanged(serde_json::from_str(payload)?)
            }
        })
    }
}
