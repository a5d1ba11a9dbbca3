//! Client execution logic with reconnection support.

use std::time::Duration;

use huddle_server::domain::RoomId;

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Where to connect and who to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the relay (e.g., "ws://127.0.0.1:8080/ws")
    pub url: String,
    /// Room to join
    pub room: String,
    /// Display name shown to other participants
    pub username: String,
}

/// Run the client with reconnection logic.
///
/// Each reconnect opens a new connection and joins the room again; the relay
/// assigns a new connection id every time.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    RoomId::new(config.room.clone()).map_err(|_| ClientError::InvalidRoomId)?;

    let mut input_rx = spawn_input_reader(&config.username);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            config.url,
            config.username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config, &mut input_rx).await {
            Ok(end) => {
                // If the session ended by user action, don't reconnect
                tracing::info!("Client session ended normally ({:?})", end);
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_client_rejects_empty_room() {
        // テスト項目: 空のルーム ID では接続を試みずにエラーになる
        // given (前提条件):
        let config = ClientConfig {
            url: "ws://127.0.0.1:1/ws".to_string(),
            room: String::new(),
            username: "Alice".to_string(),
        };

        // when (操作):
        let result = run_client(config).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidRoomId)));
    }
}
