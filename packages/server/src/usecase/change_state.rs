//! UseCase: 参加者の状態変更通知
//!
//! マイク・カメラの状態など、参加者の状態をルームの他のメンバーに通知します。
//! 状態の中身は解釈しません。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, OpaquePayload, RelayEvent, RoomRepository};

use super::error::RelayError;

/// 状態変更通知のユースケース
pub struct ChangeStateUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl ChangeStateUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 送信者以外のメンバーに PARTICIPANT_STATE_CHANGED を送り、届いた件数を返す
    pub async fn execute(
        &self,
        from: &ConnectionId,
        state: OpaquePayload,
    ) -> Result<usize, RelayError> {
        let sender = self
            .registry
            .get(from)
            .await
            .ok_or(RelayError::NotJoined(*from))?;
        let room_id = sender
            .state
            .room_id()
            .ok_or(RelayError::NotJoined(*from))?;

        let targets = self
            .repository
            .member_ids(room_id)
            .await
            .into_iter()
            .filter(|id| id != from)
            .collect();
        let event = RelayEvent::ParticipantStateChanged {
            participant_id: *from,
            state,
        };
        Ok(self.registry.broadcast(targets, &event).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Fixture;

    fn muted() -> OpaquePayload {
        OpaquePayload::from_json(r#"{"audio":false}"#.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_state_change_excludes_sender() {
        // テスト項目: 状態変更は送信者以外のメンバーにだけ届く
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let mut bob = fixture.connect_and_join("room-1", "Bob").await;
        alice.drain();
        let usecase = ChangeStateUseCase::new(fixture.repository.clone(), fixture.registry.clone());

        // when (操作):
        let delivered = usecase.execute(&alice.id, muted()).await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(
            bob.drain(),
            vec![serde_json::json!({
                "type": "PARTICIPANT_STATE_CHANGED",
                "payload": {
                    "participantId": alice.id.to_string(),
                    "state": { "audio": false }
                }
            })]
        );
        assert!(alice.drain().is_empty());
    }

    #[tokio::test]
    async fn test_state_change_from_anonymous_sender_is_rejected() {
        // テスト項目: ルームに参加していない送信者の状態変更はエラー
        // given (前提条件):
        let fixture = Fixture::new();
        let anonymous = fixture.connect().await;
        let usecase = ChangeStateUseCase::new(fixture.repository.clone(), fixture.registry.clone());

        // when (操作):
        let result = usecase.execute(&anonymous.id, muted()).await;

        // then (期待する結果):
        assert_eq!(result, Err(RelayError::NotJoined(anonymous.id)));
    }
}
