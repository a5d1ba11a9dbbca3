//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム表へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドはルーム単位でアトミックに実行されます。
//! 「ルームの解決・メンバーの変更・メンバー一覧のスナップショット」は
//! 一つのクリティカルセクションとして扱われ、空のルームは外部から観測されません。

use async_trait::async_trait;

use super::{ConnectionId, Participant, Room, RoomId, Timestamp};

/// Outcome of removing a member from a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Members still in the room after the removal
    pub remaining: Vec<ConnectionId>,
    /// Whether the removal emptied and deleted the room
    pub room_deleted: bool,
}

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 参加者を追加（ルームが存在しなければ作成）
    ///
    /// 追加する直前のメンバー一覧を返す。返り値に `participant` 自身は含まれない。
    async fn join(
        &self,
        room_id: &RoomId,
        participant: Participant,
        timestamp: Timestamp,
    ) -> Vec<Participant>;

    /// 参加者を削除（最後の一人ならルームも削除）
    ///
    /// ルームが存在しない、またはメンバーでない場合は `None`（冪等）。
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Departure>;

    /// ルームのメンバー ID 一覧を取得（ルームがなければ空）
    async fn member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// 接続がルームのメンバーかどうか
    async fn is_member(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool;

    /// Room エンティティを取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room エンティティを取得（ルーム ID 順）
    async fn get_rooms(&self) -> Vec<Room>;

    /// 存在するルーム数を取得
    async fn count_rooms(&self) -> usize;
}
