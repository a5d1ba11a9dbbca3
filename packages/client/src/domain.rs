//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::value::to_raw_value;

use huddle_server::infrastructure::dto::websocket::{
    ClientMessageType, JoinRoomPayload, ParticipantInfo, SendMessagePayload, StateChangePayload,
};

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (e.g., an invalid room id), `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::InvalidRoomId | ClientError::ReconnectExhausted(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Media track a state change refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text, sent as SEND_MESSAGE
    Chat(String),
    /// `/mute`, `/unmute`, `/video on|off`
    SetMedia { kind: MediaKind, enabled: bool },
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// `/help`
    Help,
    /// Anything else starting with `/`
    Unknown(String),
}

/// Parse a trimmed, non-empty input line.
pub fn parse_command(line: &str) -> Command {
    if !line.starts_with('/') {
        return Command::Chat(line.to_string());
    }

    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("/quit"), None, _) => Command::Quit,
        (Some("/leave"), None, _) => Command::Leave,
        (Some("/help"), None, _) => Command::Help,
        (Some("/mute"), None, _) => Command::SetMedia {
            kind: MediaKind::Audio,
            enabled: false,
        },
        (Some("/unmute"), None, _) => Command::SetMedia {
            kind: MediaKind::Audio,
            enabled: true,
        },
        (Some("/video"), Some("on"), None) => Command::SetMedia {
            kind: MediaKind::Video,
            enabled: true,
        },
        (Some("/video"), Some("off"), None) => Command::SetMedia {
            kind: MediaKind::Video,
            enabled: false,
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Outbound client envelope
#[derive(Debug, Serialize)]
struct ClientFrame<P> {
    r#type: ClientMessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<P>,
}

fn to_frame<P: Serialize>(
    r#type: ClientMessageType,
    payload: Option<P>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ClientFrame { r#type, payload })
}

/// Build the JOIN_ROOM frame sent right after connecting.
pub fn join_frame(room_id: &str, username: &str) -> Result<String, serde_json::Error> {
    to_frame(
        ClientMessageType::JoinRoom,
        Some(JoinRoomPayload {
            room_id: room_id.to_string(),
            username: username.to_string(),
        }),
    )
}

/// Build the frame a command sends, if it sends one.
pub fn encode_command(command: &Command) -> Result<Option<String>, serde_json::Error> {
    let frame = match command {
        Command::Chat(text) => to_frame(
            ClientMessageType::SendMessage,
            Some(SendMessagePayload { text: text.clone() }),
        )?,
        Command::SetMedia { kind, enabled } => {
            let mut state = serde_json::Map::new();
            state.insert(kind.as_str().to_string(), (*enabled).into());
            to_frame(
                ClientMessageType::StateChange,
                Some(StateChangePayload {
                    state: Some(to_raw_value(&state)?),
                    ..StateChangePayload::default()
                }),
            )?
        }
        Command::Leave => to_frame::<()>(ClientMessageType::LeaveRoom, None)?,
        Command::Quit | Command::Help | Command::Unknown(_) => return Ok(None),
    };
    Ok(Some(frame))
}

/// Display names of the other members of the current room.
#[derive(Debug, Default)]
pub struct Roster {
    self_id: Option<String>,
    names: HashMap<String, String>,
}

impl Roster {
    /// Reset from an EXISTING_PARTICIPANTS snapshot.
    pub fn reset(&mut self, participants: &[ParticipantInfo], self_id: &str) {
        self.self_id = Some(self_id.to_string());
        self.names = participants
            .iter()
            .map(|p| (p.id.clone(), p.username.clone()))
            .collect();
    }

    pub fn insert(&mut self, participant: &ParticipantInfo) {
        self.names
            .insert(participant.id.clone(), participant.username.clone());
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.names.remove(id)
    }

    pub fn is_self(&self, id: &str) -> bool {
        self.self_id.as_deref() == Some(id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn name_of(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_invalid_room_id() {
        // テスト項目: InvalidRoomId エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::InvalidRoomId;

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let one_before_limit = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(first);
        assert!(one_before_limit);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_invalid_room_id() {
        // テスト項目: InvalidRoomId エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::InvalidRoomId;

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_parse_command_variants() {
        // テスト項目: 入力行がコマンドに変換される
        // given (前提条件):
        let cases = [
            ("hello there", Command::Chat("hello there".to_string())),
            ("/quit", Command::Quit),
            ("/leave", Command::Leave),
            ("/help", Command::Help),
            (
                "/mute",
                Command::SetMedia {
                    kind: MediaKind::Audio,
                    enabled: false,
                },
            ),
            (
                "/unmute",
                Command::SetMedia {
                    kind: MediaKind::Audio,
                    enabled: true,
                },
            ),
            (
                "/video off",
                Command::SetMedia {
                    kind: MediaKind::Video,
                    enabled: false,
                },
            ),
            ("/video maybe", Command::Unknown("/video maybe".to_string())),
            ("/dance", Command::Unknown("/dance".to_string())),
        ];

        for (line, expected) in cases {
            // when (操作):
            let command = parse_command(line);

            // then (期待する結果):
            assert_eq!(command, expected, "line: {}", line);
        }
    }

    #[test]
    fn test_encode_chat_command() {
        // テスト項目: チャットは SEND_MESSAGE フレームになる
        // given (前提条件):
        let command = Command::Chat("hi".to_string());

        // when (操作):
        let frame = encode_command(&command).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(frame, r#"{"type":"SEND_MESSAGE","payload":{"text":"hi"}}"#);
    }

    #[test]
    fn test_encode_media_command_uses_state_shape() {
        // テスト項目: メディア状態の変更は {state: {<kind>: bool}} の STATE_CHANGE になる
        // given (前提条件):
        let command = Command::SetMedia {
            kind: MediaKind::Video,
            enabled: true,
        };

        // when (操作):
        let frame = encode_command(&command).unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            r#"{"type":"STATE_CHANGE","payload":{"state":{"video":true}}}"#
        );
    }

    #[test]
    fn test_encode_leave_and_local_commands() {
        // テスト項目: /leave は payload なしの LEAVE_ROOM、ローカルコマンドはフレームなし
        // given (前提条件):
        let leave = Command::Leave;

        // when (操作):
        let frame = encode_command(&leave).unwrap();

        // then (期待する結果):
        assert_eq!(frame.as_deref(), Some(r#"{"type":"LEAVE_ROOM"}"#));
        assert_eq!(encode_command(&Command::Quit).unwrap(), None);
        assert_eq!(encode_command(&Command::Help).unwrap(), None);
    }

    #[test]
    fn test_join_frame() {
        // テスト項目: JOIN_ROOM フレームが camelCase の roomId で作られる
        // given (前提条件):
        let room_id = "room-1";

        // when (操作):
        let frame = join_frame(room_id, "Alice").unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            r#"{"type":"JOIN_ROOM","payload":{"roomId":"room-1","username":"Alice"}}"#
        );
    }

    #[test]
    fn test_roster_tracks_names() {
        // テスト項目: ロースターが参加・退出に応じて名前を解決する
        // given (前提条件):
        let mut roster = Roster::default();
        let alice = ParticipantInfo {
            id: "a".to_string(),
            username: "Alice".to_string(),
        };
        let bob = ParticipantInfo {
            id: "b".to_string(),
            username: "Bob".to_string(),
        };

        // when (操作):
        roster.reset(std::slice::from_ref(&alice), "me");
        roster.insert(&bob);
        let removed = roster.remove("a");

        // then (期待する結果):
        assert_eq!(removed.as_deref(), Some("Alice"));
        assert_eq!(roster.name_of("b"), "Bob");
        assert_eq!(roster.name_of("unknown"), "unknown");
        assert!(roster.is_self("me"));
        assert_eq!(roster.len(), 1);
    }
}
