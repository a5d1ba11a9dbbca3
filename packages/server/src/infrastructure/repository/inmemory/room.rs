//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルーム表を HashMap で保持し、ルームごとに個別のロックを持ちます。
//!
//! ## ロックの規約
//!
//! - ルーム表のロックは短時間だけ保持し、既存ルームのロック取得を待つ間は保持しない
//! - ルームの削除はルームのロックを保持したまま、ルーム表のロックを取って行う
//! - 削除されたルームには `closed` が立つので、古い参照で join した側はやり直す
//!
//! これにより、無関係なルーム同士は直列化されず、空のルームは外部から観測されません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    ConnectionId, Departure, Participant, Room, RoomId, RoomRepository, Timestamp,
};

/// ルームと削除済みフラグ
struct RoomSlot {
    room: Room,
    closed: bool,
}

type SharedSlot = Arc<Mutex<RoomSlot>>;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// Key: room id, Value: そのルーム専用のロック
    rooms: Mutex<HashMap<RoomId, SharedSlot>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// ルームのロックを取得（存在しなければ作成してから）
    ///
    /// 新規作成したルームはロックを取った状態でルーム表に登録するため、
    /// メンバーが追加される前の空の状態を他の操作が観測することはない。
    async fn lock_or_create(
        &self,
        room_id: &RoomId,
        timestamp: Timestamp,
    ) -> OwnedMutexGuard<RoomSlot> {
        let mut rooms = self.rooms.lock().await;
        if let Some(slot) = rooms.get(room_id) {
            let slot = Arc::clone(slot);
            drop(rooms);
            return slot.lock_owned().await;
        }

        let slot = Arc::new(Mutex::new(RoomSlot {
            room: Room::new(room_id.clone(), timestamp),
            closed: false,
        }));
        let guard = Arc::clone(&slot).lock_owned().await;
        rooms.insert(room_id.clone(), slot);
        tracing::info!("Room '{}' created", room_id);
        guard
    }

    async fn find_slot(&self, room_id: &RoomId) -> Option<SharedSlot> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    /// 生存中のルームのスナップショットを取得
    async fn snapshot(slot: &SharedSlot) -> Option<Room> {
        let guard = slot.lock().await;
        (!guard.closed && !guard.room.is_empty()).then(|| guard.room.clone())
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(
        &self,
        room_id: &RoomId,
        participant: Participant,
        timestamp: Timestamp,
    ) -> Vec<Participant> {
        loop {
            let mut slot = self.lock_or_create(room_id, timestamp).await;
            if slot.closed {
                // 最後のメンバーが抜けて削除された直後のルームを掴んだ
                continue;
            }

            let existing: Vec<Participant> = slot
                .room
                .members
                .iter()
                .filter(|p| p.id != participant.id)
                .cloned()
                .collect();
            tracing::info!(
                "Connection '{}' ({}) joined room '{}'",
                participant.id,
                participant.display_name,
                room_id
            );
            slot.room.add_member(participant);
            return existing;
        }
    }

    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId) -> Option<Departure> {
        let slot = self.find_slot(room_id).await?;
        let mut guard = slot.lock().await;
        if guard.closed {
            return None;
        }
        guard.room.remove_member(connection_id)?;
        tracing::info!("Connection '{}' removed from room '{}'", connection_id, room_id);

        let remaining = guard.room.member_ids();
        let room_deleted = remaining.is_empty();
        if room_deleted {
            guard.closed = true;
            let mut rooms = self.rooms.lock().await;
            if rooms
                .get(room_id)
                .is_some_and(|current| Arc::ptr_eq(current, &slot))
            {
                rooms.remove(room_id);
            }
            tracing::info!("Room '{}' is empty and has been deleted", room_id);
        }

        Some(Departure {
            remaining,
            room_deleted,
        })
    }

    async fn member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        match self.find_slot(room_id).await {
            Some(slot) => Self::snapshot(&slot)
                .await
                .map(|room| room.member_ids())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    async fn is_member(&self, room_id: &RoomId, connection_id: &ConnectionId) -> bool {
        let Some(slot) = self.find_slot(room_id).await else {
            return false;
        };
        let guard = slot.lock().await;
        !guard.closed && guard.room.contains(connection_id)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let slot = self.find_slot(room_id).await?;
        Self::snapshot(&slot).await
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let slots: Vec<SharedSlot> = self.rooms.lock().await.values().cloned().collect();
        let mut rooms = Vec::with_capacity(slots.len());
        for slot in &slots {
            if let Some(room) = Self::snapshot(slot).await {
                rooms.push(room);
            }
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
