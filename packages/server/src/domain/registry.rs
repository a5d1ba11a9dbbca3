//! Connection Registry trait 定義
//!
//! 接続中のクライアントの唯一の所有者です。接続 ID から送信チャンネルと
//! プロトコル状態（ルーム・表示名）を解決します。ルームは接続 ID のみを保持し、
//! 接続の無効化はこのレジストリ一箇所で行われます。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{Connection, ConnectionId, ConnectionState, DisplayName, RelayEvent, RoomId, Timestamp};

/// Outbound queue of one connection (serialized frames).
pub type OutboundChannel = mpsc::Sender<String>;

/// Result of a best-effort send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued on the connection's outbound channel
    Delivered,
    /// Connection unknown, closed, or its queue is full
    Dropped,
}

impl Delivery {
    pub fn is_delivered(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Connection Registry trait
///
/// 送信は決してブロックせず、失敗は `Delivery::Dropped` として返す（エラーではない）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 新しい接続を登録し、一意な ID を払い出す
    async fn register(&self, sender: OutboundChannel, connected_at: Timestamp) -> ConnectionId;

    /// 接続を登録解除し、削除された接続を返す
    ///
    /// 未登録・登録解除済みの ID に対しては `None`（冪等）。
    async fn unregister(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続のスナップショットを取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 接続を Joined 状態にし、直前の状態を返す（未登録なら `None`）
    async fn mark_joined(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Option<ConnectionState>;

    /// 接続を Anonymous 状態に戻し、直前の状態を返す（未登録なら `None`）
    async fn mark_anonymous(&self, connection_id: &ConnectionId) -> Option<ConnectionState>;

    /// 特定の接続にイベントを送信
    async fn push_to(&self, connection_id: &ConnectionId, event: &RelayEvent) -> Delivery;

    /// 複数の接続にイベントを送信し、配送できた数を返す
    async fn broadcast(&self, targets: Vec<ConnectionId>, event: &RelayEvent) -> usize;

    /// 接続数を取得
    async fn count(&self) -> usize;
}
