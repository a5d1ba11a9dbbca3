//! WebSocket を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（bounded `mpsc::Sender`）とプロトコル状態の管理
//! - `RelayEvent` を JSON フレームにシリアライズしてキューに積む（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。
//! 送信は `try_send` のみで行い、キューが満杯・切断済みの相手への送信は破棄します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::{
    domain::{
        Connection, ConnectionId, ConnectionRegistry, ConnectionState, Delivery, DisplayName,
        OutboundChannel, RelayEvent, RoomId, Timestamp,
    },
    infrastructure::dto::conversion::encode_event,
};

/// 接続レコードと送信キュー
struct ConnectionEntry {
    connection: Connection,
    sender: OutboundChannel,
}

impl ConnectionEntry {
    fn try_push(&self, frame: String) -> Delivery {
        match self.sender.try_send(frame) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Outbound queue of '{}' is full, dropping message",
                    self.connection.id
                );
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    "Connection '{}' is closed, dropping message",
                    self.connection.id
                );
                Delivery::Dropped
            }
        }
    }
}

/// WebSocket を使った ConnectionRegistry 実装
///
/// ## 使用例
///
/// ```ignore
/// let registry = WebSocketConnectionRegistry::new();
/// let (tx, rx) = tokio::sync::mpsc::channel(256);
/// let id = registry.register(tx, Timestamp::new(0)).await;
/// registry.push_to(&id, &RelayEvent::ParticipantLeft { id }).await;
/// ```
pub struct WebSocketConnectionRegistry {
    /// Key: connection id
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl WebSocketConnectionRegistry {
    /// 新しい WebSocketConnectionRegistry を作成
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }

    async fn replace_state(
        &self,
        connection_id: &ConnectionId,
        state: ConnectionState,
    ) -> Option<ConnectionState> {
        let mut connections = self.connections.lock().await;
        let entry = connections.get_mut(connection_id)?;
        Some(std::mem::replace(&mut entry.connection.state, state))
    }
}

impl Default for WebSocketConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register(&self, sender: OutboundChannel, connected_at: Timestamp) -> ConnectionId {
        let mut connections = self.connections.lock().await;
        let mut connection_id = ConnectionId::generate();
        while connections.contains_key(&connection_id) {
            connection_id = ConnectionId::generate();
        }
        connections.insert(
            connection_id,
            ConnectionEntry {
                connection: Connection::new(connection_id, connected_at),
                sender,
            },
        );
        tracing::debug!("Connection '{}' registered", connection_id);
        connection_id
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let entry = connections.remove(connection_id)?;
        tracing::debug!("Connection '{}' unregistered", connection_id);
        Some(entry.connection)
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .map(|entry| entry.connection.clone())
    }

    async fn mark_joined(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Option<ConnectionState> {
        self.replace_state(
            connection_id,
            ConnectionState::Joined {
                room_id,
                display_name,
            },
        )
        .await
    }

    async fn mark_anonymous(&self, connection_id: &ConnectionId) -> Option<ConnectionState> {
        self.replace_state(connection_id, ConnectionState::Anonymous)
            .await
    }

    async fn push_to(&self, connection_id: &ConnectionId, event: &RelayEvent) -> Delivery {
        let frame = match encode_event(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to encode event for '{}': {}", connection_id, e);
                return Delivery::Dropped;
            }
        };

        let connections = self.connections.lock().await;
        match connections.get(connection_id) {
            Some(entry) => {
                let delivery = entry.try_push(frame);
                if delivery.is_delivered() {
                    tracing::debug!("Pushed message to connection '{}'", connection_id);
                }
                delivery
            }
            None => {
                tracing::debug!("Connection '{}' not found, dropping message", connection_id);
                Delivery::Dropped
            }
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &RelayEvent) -> usize {
        if targets.is_empty() {
            return 0;
        }
        let frame = match encode_event(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("Failed to encode broadcast event: {}", e);
                return 0;
            }
        };

        let connections = self.connections.lock().await;
        let mut delivered = 0;
        for target in &targets {
            // ブロードキャストでは一部の送信失敗を許容
            match connections.get(target) {
                Some(entry) => {
                    if entry.try_push(frame.clone()).is_delivered() {
                        delivered += 1;
                    }
                }
                None => {
                    tracing::debug!("Connection '{}' not found during broadcast, skipping", target);
                }
            }
        }
        tracing::debug!("Broadcasted message to {}/{} connections", delivered, targets.len());
        delivered
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
