//! Message formatting utilities for client display.

use huddle_server::infrastructure::dto::websocket::{NewMessagePayload, ParticipantInfo};
use huddle_shared::time::timestamp_to_clock_time;
use serde_json::Value;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the EXISTING_PARTICIPANTS snapshot received after joining
    ///
    /// # Arguments
    ///
    /// * `room_id` - The room that was joined
    /// * `participants` - Members present before this client joined
    pub fn format_room_joined(room_id: &str, participants: &[ParticipantInfo]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Joined room '{}'. Participants:\n", room_id));

        if participants.is_empty() {
            output.push_str("(No other participants)\n");
        } else {
            for participant in participants {
                output.push_str(&format!("{} ({})\n", participant.username, participant.id));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format a NEW_PARTICIPANT notification
    pub fn format_participant_joined(participant: &ParticipantInfo) -> String {
        format!("\n+ {} joined\n", participant.username)
    }

    /// Format a PARTICIPANT_LEFT notification
    pub fn format_participant_left(name: &str) -> String {
        format!("\n- {} left\n", name)
    }

    /// Format a chat message
    ///
    /// Messages echoed back to their sender are shown as a short confirmation.
    pub fn format_chat_message(message: &NewMessagePayload, is_me: bool) -> String {
        let sent_at = timestamp_to_clock_time(message.timestamp);
        if is_me {
            return format!("sent at {}\n", sent_at);
        }
        format!(
            "\n\n------------------------------------------------------------\n\
             @{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            message.sender_name, message.text, sent_at
        )
    }

    /// Format a PARTICIPANT_STATE_CHANGED notification
    ///
    /// Boolean media flags are spelled out (`audio off`); anything else is shown as JSON.
    pub fn format_state_changed(name: &str, state: &str) -> String {
        let described = match serde_json::from_str::<Value>(state) {
            Ok(Value::Object(map)) if !map.is_empty() && map.values().all(Value::is_boolean) => map
                .iter()
                .map(|(kind, enabled)| {
                    let status = if enabled.as_bool() == Some(true) { "on" } else { "off" };
                    format!("{} {}", kind, status)
                })
                .collect::<Vec<_>>()
                .join(", "),
            _ => state.to_string(),
        };
        format!("\n* {}: {}\n", name, described)
    }

    /// Format a relayed SIGNAL
    ///
    /// Only the kind of negotiation message is shown (`offer`, `answer`, `candidate`).
    pub fn format_signal(from_name: &str, signal: &str) -> String {
        let kind = match serde_json::from_str::<Value>(signal) {
            Ok(Value::Object(map)) => match map.get("type").and_then(Value::as_str) {
                Some(kind) => kind.to_string(),
                None if map.contains_key("candidate") => "candidate".to_string(),
                None => "signal".to_string(),
            },
            _ => "signal".to_string(),
        };
        format!("\n← {} from {} (not answered)\n", kind, from_name)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format the list of prompt commands
    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  <text>            send a chat message",
            "  /mute, /unmute    toggle your microphone state",
            "  /video on|off     toggle your camera state",
            "  /leave            leave the room",
            "  /quit             exit",
            "",
        ]
        .join("\n")
    }
}
