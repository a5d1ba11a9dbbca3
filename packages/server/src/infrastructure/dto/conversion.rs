//! Conversion logic between DTOs and domain entities.

use serde::Serialize;

use huddle_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ChatMessage, DisplayName, Participant, RelayEvent, Room, RoomId, ValueObjectError,
};
use crate::infrastructure::dto::{
    http::{ParticipantDetailDto, RoomDetailDto, RoomSummaryDto},
    websocket::{
        ExistingParticipantsPayload, JoinRoomPayload, NewMessagePayload, ParticipantInfo,
        ParticipantLeftPayload, ParticipantStateChangedPayload, RelayedSignalPayload,
        ServerEnvelope, ServerMessageType,
    },
};

// ========================================
// DTO → Domain Entity
// ========================================

impl JoinRoomPayload {
    /// Validate the join request into domain values.
    pub fn into_domain(self) -> Result<(RoomId, DisplayName), ValueObjectError> {
        Ok((RoomId::new(self.room_id)?, DisplayName::from(self.username)))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Participant> for ParticipantInfo {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.to_string(),
            username: model.display_name.into_string(),
        }
    }
}

impl From<ChatMessage> for NewMessagePayload {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.to_string(),
            sender_id: model.sender_id.to_string(),
            sender_name: model.sender_name.into_string(),
            text: model.text.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room.members.iter().map(|p| p.id.to_string()).collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .members
                .iter()
                .map(|p| ParticipantDetailDto {
                    id: p.id.to_string(),
                    username: p.display_name.as_str().to_string(),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

/// Serialize a relay event into a WebSocket text frame.
pub fn encode_event(event: &RelayEvent) -> Result<String, serde_json::Error> {
    match event {
        RelayEvent::ExistingParticipants {
            participants,
            self_id,
        } => to_frame(
            ServerMessageType::ExistingParticipants,
            ExistingParticipantsPayload {
                participants: participants.iter().cloned().map(Into::into).collect(),
                self_id: self_id.to_string(),
            },
        ),
        RelayEvent::NewParticipant(participant) => to_frame(
            ServerMessageType::NewParticipant,
            ParticipantInfo::from(participant.clone()),
        ),
        RelayEvent::ParticipantLeft { id } => to_frame(
            ServerMessageType::ParticipantLeft,
            ParticipantLeftPayload { id: id.to_string() },
        ),
        RelayEvent::Signal { from, signal } => to_frame(
            ServerMessageType::Signal,
            RelayedSignalPayload {
                from: from.to_string(),
                signal: signal.as_raw().to_owned(),
            },
        ),
        RelayEvent::NewMessage(message) => to_frame(
            ServerMessageType::NewMessage,
            NewMessagePayload::from(message.clone()),
        ),
        RelayEvent::ParticipantStateChanged {
            participant_id,
            state,
        } => to_frame(
            ServerMessageType::ParticipantStateChanged,
            ParticipantStateChangedPayload {
                participant_id: participant_id.to_string(),
                state: state.as_raw().to_owned(),
            },
        ),
    }
}

fn to_frame<P: Serialize>(
    r#type: ServerMessageType,
    payload: P,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ServerEnvelope { r#type, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessageText, OpaquePayload, Timestamp};

    #[test]
    fn test_join_room_payload_to_domain() {
        // テスト項目: JOIN_ROOM の payload がドメインの値に変換される
        // given (前提条件):
        let payload = JoinRoomPayload {
            room_id: "room-1".to_string(),
            username: "Alice".to_string(),
        };

        // when (操作):
        let (room_id, display_name) = payload.into_domain().unwrap();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), "room-1");
        assert_eq!(display_name.as_str(), "Alice");
    }

    #[test]
    fn test_join_room_payload_with_empty_room_is_rejected() {
        // テスト項目: 空の roomId を持つ JOIN_ROOM は変換できない
        // given (前提条件):
        let payload = JoinRoomPayload {
            room_id: String::new(),
            username: "Alice".to_string(),
        };

        // when (操作):
        let result = payload.into_domain();

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomId));
    }

    #[test]
    fn test_encode_existing_participants() {
        // テスト項目: EXISTING_PARTICIPANTS が仕様どおりの JSON になる
        // given (前提条件):
        let alice = Participant::new(ConnectionId::generate(), "Alice".into());
        let self_id = ConnectionId::generate();
        let event = RelayEvent::ExistingParticipants {
            participants: vec![alice.clone()],
            self_id,
        };

        // when (操作):
        let frame = encode_event(&event).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "EXISTING_PARTICIPANTS",
                "payload": {
                    "participants": [{ "id": alice.id.to_string(), "username": "Alice" }],
                    "selfId": self_id.to_string(),
                }
            })
        );
    }

    #[test]
    fn test_encode_signal_is_verbatim() {
        // テスト項目: SIGNAL の signal はバイト列を保ったまま出力される
        // given (前提条件):
        let from = ConnectionId::generate();
        let raw = r#"{"sdp":"x",  "type":"offer"}"#;
        let event = RelayEvent::Signal {
            from,
            signal: OpaquePayload::from_json(raw.to_string()).unwrap(),
        };

        // when (操作):
        let frame = encode_event(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            format!(
                r#"{{"type":"SIGNAL","payload":{{"from":"{}","signal":{}}}}}"#,
                from, raw
            )
        );
    }

    #[test]
    fn test_encode_new_message() {
        // テスト項目: NEW_MESSAGE が camelCase のフィールドで出力される
        // given (前提条件):
        let sender = ConnectionId::generate();
        let message = ChatMessage::new(
            sender,
            "Alice".into(),
            MessageText::from("hello".to_string()),
            Timestamp::new(1234),
        );

        // when (操作):
        let frame = encode_event(&RelayEvent::NewMessage(message.clone())).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["type"], "NEW_MESSAGE");
        assert_eq!(value["payload"]["id"], message.id.to_string());
        assert_eq!(value["payload"]["senderId"], sender.to_string());
        assert_eq!(value["payload"]["senderName"], "Alice");
        assert_eq!(value["payload"]["text"], "hello");
        assert_eq!(value["payload"]["timestamp"], 1234);
    }

    #[test]
    fn test_room_to_summary_dto() {
        // テスト項目: Room がサマリー DTO に変換される
        // given (前提条件):
        let mut room = Room::new(
            RoomId::new("room-1".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );
        let alice = ConnectionId::generate();
        room.add_member(Participant::new(alice, "Alice".into()));

        // when (操作):
        let dto = RoomSummaryDto::from(&room);

        // then (期待する結果):
        assert_eq!(dto.id, "room-1");
        assert_eq!(dto.participants, vec![alice.to_string()]);
        assert_eq!(dto.created_at, "2023-01-01T00:00:00.000Z");
    }
}
