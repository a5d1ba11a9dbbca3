//! UseCase: 接続受付処理
//!
//! 新しいトランスポート接続をレジストリに登録し、接続 ID を払い出します。
//! 登録直後の接続は Anonymous（どのルームにも属さない）状態です。

use std::sync::Arc;

use huddle_shared::time::Clock;

use crate::domain::{ConnectionId, ConnectionRegistry, OutboundChannel, Timestamp};

/// 接続受付のユースケース
pub struct ConnectParticipantUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 接続を登録
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 払い出された接続 ID
    pub async fn execute(&self, sender: OutboundChannel) -> ConnectionId {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection_id = self.registry.register(sender, connected_at).await;
        tracing::info!("Client connected: {}", connection_id);
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ConnectionState, usecase::test_support::{FIXED_NOW, Fixture}};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_anonymous_connection() {
        // テスト項目: 接続すると Anonymous 状態で登録される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = ConnectParticipantUseCase::new(fixture.registry.clone(), fixture.clock.clone());
        let (tx, _rx) = mpsc::channel(8);

        // when (操作):
        let id = usecase.execute(tx).await;

        // then (期待する結果):
        let connection = fixture.registry.get(&id).await.unwrap();
        assert_eq!(connection.state, ConnectionState::Anonymous);
        assert_eq!(connection.connected_at, Timestamp::new(FIXED_NOW));
        assert_eq!(fixture.registry.count().await, 1);
    }
}
