//! UseCase: 切断処理
//!
//! 接続をレジストリから外し、ルームに参加していれば退出処理を行います。
//! レジストリからの登録解除が一度しか成功しないため、
//! 同じ接続に対して切断とエラーが同時に発生しても退出処理は一度だけ実行されます。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, ConnectionState, Departure, RoomRepository};

use super::leave_room::depart;

/// 切断処理のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 切断処理を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断された接続の ID
    ///
    /// # Returns
    ///
    /// 参加中のルームから退出した場合は `Some(Departure)`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let Some(connection) = self.registry.unregister(connection_id).await else {
            tracing::debug!("Connection '{}' was already cleaned up", connection_id);
            return None;
        };
        tracing::info!("Client disconnected: {}", connection_id);

        match connection.state {
            ConnectionState::Joined { room_id, .. } => {
                depart(
                    self.repository.as_ref(),
                    self.registry.as_ref(),
                    connection_id,
                    &room_id,
                )
                .await
            }
            ConnectionState::Anonymous => None,
        }
    }
}
