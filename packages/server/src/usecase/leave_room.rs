//! UseCase: ルーム退出処理
//!
//! LEAVE_ROOM（明示的な退出）、再 JOIN_ROOM（暗黙の退出）、切断の
//! 3 つの経路から呼ばれる、ルームを削除し得る唯一の処理です。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - 残ったメンバーへの PARTICIPANT_LEFT 通知、最後の一人が抜けた時のルーム削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人のルームからの退出
//! - エッジケース：最後の一人の退出、未参加状態での退出（何もしない）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, ConnectionState, Departure, RelayEvent, RoomId,
    RoomRepository,
};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 接続を Anonymous に戻し、参加中だったルームから退出させる
    ///
    /// # Returns
    ///
    /// * `Some(Departure)` - 退出した場合（残ったメンバーとルーム削除の有無）
    /// * `None` - ルームに参加していなかった場合
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Departure> {
        match self.registry.mark_anonymous(connection_id).await? {
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

/// ルームのメンバーから外し、残ったメンバーに PARTICIPANT_LEFT を通知する
pub(super) async fn depart(
    repository: &dyn RoomRepository,
    registry: &dyn ConnectionRegistry,
    connection_id: &ConnectionId,
    room_id: &RoomId,
) -> Option<Departure> {
    let departure = repository.leave(room_id, connection_id).await?;
    registry
        .broadcast(
            departure.remaining.clone(),
            &RelayEvent::ParticipantLeft { id: *connection_id },
        )
        .await;
    Some(departure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Fixture, room_id};

    fn usecase(fixture: &Fixture) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(fixture.repository.clone(), fixture.registry.clone())
    }

    #[tokio::test]
    async fn test_leave_notifies_remaining_members() {
        // テスト項目: 退出すると残ったメンバーに PARTICIPANT_LEFT が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let mut bob = fixture.connect_and_join("room-1", "Bob").await;
        alice.drain();

        // when (操作):
        let departure = usecase(&fixture).execute(&bob.id).await;

        // then (期待する結果):
        assert_eq!(
            departure,
            Some(Departure {
                remaining: vec![alice.id],
                room_deleted: false,
            })
        );
        assert_eq!(
            alice.drain(),
            vec![serde_json::json!({
                "type": "PARTICIPANT_LEFT",
                "payload": { "id": bob.id.to_string() }
            })]
        );
        assert!(bob.drain().is_empty());
        let state = fixture.registry.get(&bob.id).await.unwrap().state;
        assert_eq!(state, ConnectionState::Anonymous);
    }

    #[tokio::test]
    async fn test_last_member_leaving_deletes_room() {
        // テスト項目: 最後のメンバーが退出するとルームが削除される
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect_and_join("room-1", "Alice").await;

        // when (操作):
        let departure = usecase(&fixture).execute(&alice.id).await;

        // then (期待する結果):
        assert_eq!(departure.map(|d| d.room_deleted), Some(true));
        assert_eq!(fixture.repository.get_room(&room_id("room-1")).await, None);
    }

    #[tokio::test]
    async fn test_leave_without_joining_is_noop() {
        // テスト項目: ルームに参加していない接続の退出は何もしない
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect().await;

        // when (操作):
        let departure = usecase(&fixture).execute(&alice.id).await;
        let unknown = usecase(&fixture).execute(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(departure, None);
        assert_eq!(unknown, None);
    }

    #[tokio::test]
    async fn test_leave_twice_runs_once() {
        // テスト項目: 二度目の退出では通知が送られない
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let bob = fixture.connect_and_join("room-1", "Bob").await;
        alice.drain();
        usecase(&fixture).execute(&bob.id).await;
        alice.drain();

        // when (操作):
        let second = usecase(&fixture).execute(&bob.id).await;

        // then (期待する結果):
        assert_eq!(second, None);
        assert!(alice.drain().is_empty());
    }
}
