//! UseCase: シグナル中継処理
//!
//! SIGNAL を送信者と同じルームにいる宛先一人だけに転送します。
//! signal の中身は解釈せず、受け取ったバイト列のまま渡します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySignalUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 別のルームの接続にシグナルが漏れないことを保証する
//! - 宛先以外のメンバーにシグナルが届かないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームのメンバーへの転送
//! - 異常系：未参加の送信者、別ルーム・存在しない宛先（黙って破棄）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, Delivery, OpaquePayload, RelayEvent, RoomRepository,
};

use super::error::RelayError;

/// シグナル中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// シグナル中継を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の接続 ID
    /// * `to` - 宛先の接続 ID
    /// * `signal` - 中継する不透明なペイロード
    ///
    /// # Returns
    ///
    /// * `Ok(Delivery::Delivered)` - 宛先の送信キューに積まれた
    /// * `Ok(Delivery::Dropped)` - 宛先が同じルームにいない、または送信できなかった
    /// * `Err(RelayError)` - 送信者がルームに参加していない
    pub async fn execute(
        &self,
        from: &ConnectionId,
        to: &ConnectionId,
        signal: OpaquePayload,
    ) -> Result<Delivery, RelayError> {
        let sender = self
            .registry
            .get(from)
            .await
            .ok_or(RelayError::NotJoined(*from))?;
        let room_id = sender
            .state
            .room_id()
            .ok_or(RelayError::NotJoined(*from))?;

        if !self.repository.is_member(room_id, to).await {
            tracing::debug!(
                "Signal from '{}' to '{}' dropped: target is not in room '{}'",
                from,
                to,
                room_id
            );
            return Ok(Delivery::Dropped);
        }

        let event = RelayEvent::Signal {
            from: *from,
            signal,
        };
        Ok(self.registry.push_to(to, &event).await)
    }
}
