//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - チャットメッセージの生成（ID・送信者名・タイムスタンプの付与）とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身を含むルームの全メンバーにメッセージが届くことを保証する
//! - 別のルームにメッセージが漏れないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：ルームに参加していない送信者
//! - エッジケース：送信者のみがルームにいる場合

use std::sync::Arc;

use huddle_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, ConnectionRegistry, MessageText, RelayEvent, RoomRepository,
    Timestamp,
};

use super::error::RelayError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            registry,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - メッセージ送信者の接続 ID
    /// * `text` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - ブロードキャストしたメッセージ
    /// * `Err(RelayError)` - 送信者がルームに参加していない
    pub async fn execute(
        &self,
        from: &ConnectionId,
        text: MessageText,
    ) -> Result<ChatMessage, RelayError> {
        // 1. 送信者の参加中ルームと表示名を解決
        let sender = self
            .registry
            .get(from)
            .await
            .ok_or(RelayError::NotJoined(*from))?;
        let participant = sender.participant().ok_or(RelayError::NotJoined(*from))?;
        let room_id = sender
            .state
            .room_id()
            .ok_or(RelayError::NotJoined(*from))?;

        // 2. ID とタイムスタンプを付与してメッセージを生成
        let message = ChatMessage::new(
            participant.id,
            participant.display_name,
            text,
            Timestamp::new(self.clock.now_millis()),
        );

        // 3. 送信者を含むルームの全メンバーにブロードキャスト
        let targets = self.repository.member_ids(room_id).await;
        let delivered = self
            .registry
            .broadcast(targets, &RelayEvent::NewMessage(message.clone()))
            .await;
        tracing::debug!(
            "Message '{}' from '{}' delivered to {} member(s) of room '{}'",
            message.id,
            from,
            delivered,
            room_id
        );

        Ok(message)
    }
}
