//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者本人への EXISTING_PARTICIPANTS と、既存メンバーへの NEW_PARTICIPANT
//!
//! ### なぜこのテストが必要か
//! - 新規参加者が自分自身を既存参加者として受け取らないことを保証する
//! - 既存メンバーそれぞれに NEW_PARTICIPANT がちょうど一度だけ届くことを保証する
//! - 参加中に別のルームへ JOIN_ROOM した場合、元のルームから退出することを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存メンバーのいるルームへの参加
//! - エッジケース：同名ユーザー、再 JOIN_ROOM、登録解除済みの接続

use std::sync::Arc;

use huddle_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRegistry, ConnectionState, DisplayName, Participant, RelayEvent,
    RoomId, RoomRepository, Timestamp,
};

use super::{error::JoinRoomError, leave_room::depart};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// ルーム参加を実行
    ///
    /// 既に別のルーム（または同じルーム）に参加している場合は、先に退出してから参加します。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `room_id` - 参加先のルーム ID（存在しなければ作成される）
    /// * `display_name` - ルーム内での表示名（重複可）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Participant>)` - 参加直前にルームにいたメンバー
    /// * `Err(JoinRoomError)` - 接続が既に登録解除されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Result<Vec<Participant>, JoinRoomError> {
        // 1. 接続の状態を Joined に更新（直前の状態を受け取る）
        let previous = self
            .registry
            .mark_joined(&connection_id, room_id.clone(), display_name.clone())
            .await
            .ok_or(JoinRoomError::ConnectionNotFound(connection_id))?;

        // 2. 参加中だったルームから退出
        if let ConnectionState::Joined {
            room_id: previous_room,
            ..
        } = previous
        {
            tracing::info!(
                "Connection '{}' switches from room '{}' to '{}'",
                connection_id,
                previous_room,
                room_id
            );
            depart(
                self.repository.as_ref(),
                self.registry.as_ref(),
                &connection_id,
                &previous_room,
            )
            .await;
        }

        // 3. メンバーに追加し、追加直前のメンバーを受け取る
        let participant = Participant::new(connection_id, display_name);
        let existing = self
            .repository
            .join(
                &room_id,
                participant.clone(),
                Timestamp::new(self.clock.now_millis()),
            )
            .await;

        // 4. 参加者本人には既存メンバーの一覧を送る
        self.registry
            .push_to(
                &connection_id,
                &RelayEvent::ExistingParticipants {
                    participants: existing.clone(),
                    self_id: connection_id,
                },
            )
            .await;

        // 5. 既存メンバーには新規参加者を通知する
        let targets = existing.iter().map(|p| p.id).collect();
        self.registry
            .broadcast(targets, &RelayEvent::NewParticipant(participant))
            .await;

        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Fixture, room_id};

    #[tokio::test]
    async fn test_first_joiner_receives_empty_participants() {
        // テスト項目: 空のルームに参加すると EXISTING_PARTICIPANTS は空で selfId が自分
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect().await;

        // when (操作):
        let existing = fixture
            .join_room_usecase()
            .execute(alice.id, room_id("room-1"), "Alice".into())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(existing.is_empty());
        assert_eq!(
            alice.drain(),
            vec![serde_json::json!({
                "type": "EXISTING_PARTICIPANTS",
                "payload": { "participants": [], "selfId": alice.id.to_string() }
            })]
        );
    }

    #[tokio::test]
    async fn test_second_joiner_and_existing_member_are_notified() {
        // テスト項目: 2 人目は 1 人目を既存参加者として受け取り、1 人目には NEW_PARTICIPANT が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let mut bob = fixture.connect().await;

        // when (操作):
        fixture
            .join_room_usecase()
            .execute(bob.id, room_id("room-1"), "Bob".into())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            bob.drain(),
            vec![serde_json::json!({
                "type": "EXISTING_PARTICIPANTS",
                "payload": {
                    "participants": [{ "id": alice.id.to_string(), "username": "Alice" }],
                    "selfId": bob.id.to_string(),
                }
            })]
        );
        assert_eq!(
            alice.drain(),
            vec![serde_json::json!({
                "type": "NEW_PARTICIPANT",
                "payload": { "id": bob.id.to_string(), "username": "Bob" }
            })]
        );
    }

    #[tokio::test]
    async fn test_each_existing_member_gets_exactly_one_new_participant() {
        // テスト項目: 3 人目の参加で既存の 2 人にそれぞれ一度だけ NEW_PARTICIPANT が届く
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let mut bob = fixture.connect_and_join("room-1", "Bob").await;
        alice.drain();
        let mut carol = fixture.connect().await;

        // when (操作):
        fixture
            .join_room_usecase()
            .execute(carol.id, room_id("room-1"), "Carol".into())
            .await
            .unwrap();

        // then (期待する結果):
        for member in [&mut alice, &mut bob] {
            let frames = member.drain();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0]["type"], "NEW_PARTICIPANT");
            assert_eq!(frames[0]["payload"]["id"], carol.id.to_string());
        }
        let frames = carol.drain();
        assert_eq!(frames.len(), 1);
        let ids: Vec<&str> = frames[0]["payload"]["participants"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&carol.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn test_duplicate_usernames_are_allowed() {
        // テスト項目: 同じ表示名のユーザーも別の参加者として扱われる
        // given (前提条件):
        let fixture = Fixture::new();
        fixture.connect_and_join("room-1", "Alice").await;
        let other = fixture.connect().await;

        // when (操作):
        let existing = fixture
            .join_room_usecase()
            .execute(other.id, room_id("room-1"), "Alice".into())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(existing.len(), 1);
        assert_eq!(
            fixture.repository.member_ids(&room_id("room-1")).await.len(),
            2
        );
    }

    #[tokio::test]
    async fn test_rejoin_moves_connection_to_new_room() {
        // テスト項目: 参加中に別のルームへ JOIN_ROOM すると元のルームから退出する
        // given (前提条件):
        let fixture = Fixture::new();
        let mut alice = fixture.connect_and_join("room-1", "Alice").await;
        let mut bob = fixture.connect_and_join("room-1", "Bob").await;
        alice.drain();

        // when (操作):
        fixture
            .join_room_usecase()
            .execute(bob.id, room_id("room-2"), "Bob".into())
            .await
            .unwrap();

        // then (期待する結果):
        let frames = alice.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "PARTICIPANT_LEFT");
        assert_eq!(
            fixture.repository.member_ids(&room_id("room-1")).await,
            vec![alice.id]
        );
        assert_eq!(
            fixture.repository.member_ids(&room_id("room-2")).await,
            vec![bob.id]
        );
        let frames = bob.drain();
        assert_eq!(frames[0]["type"], "EXISTING_PARTICIPANTS");
        let state = fixture.registry.get(&bob.id).await.unwrap().state;
        assert_eq!(state.room_id(), Some(&room_id("room-2")));
    }

    #[tokio::test]
    async fn test_rejoin_last_member_deletes_previous_room() {
        // テスト項目: 最後のメンバーが別のルームへ移ると元のルームは削除される
        // given (前提条件):
        let fixture = Fixture::new();
        let alice = fixture.connect_and_join("room-1", "Alice").await;

        // when (操作):
        fixture
            .join_room_usecase()
            .execute(alice.id, room_id("room-2"), "Alice".into())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(fixture.repository.get_room(&room_id("room-1")).await, None);
        assert_eq!(fixture.repository.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_join_with_unregistered_connection_fails() {
        // テスト項目: 登録解除済みの接続は参加できず、ルームも作成されない
        // given (前提条件):
        let fixture = Fixture::new();
        let ghost = ConnectionId::generate();

        // when (操作):
        let result = fixture
            .join_room_usecase()
            .execute(ghost, room_id("room-1"), "Ghost".into())
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::ConnectionNotFound(ghost)));
        assert_eq!(fixture.repository.count_rooms().await, 0);
    }
}
