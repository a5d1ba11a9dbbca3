//! UseCase テスト用のフィクスチャ
//!
//! 実際のインメモリ実装を組み合わせ、接続ごとの送信キューから
//! 受け取ったフレームを JSON として検証できるようにします。

use std::sync::Arc;

use huddle_shared::time::FixedClock;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionRegistry, RoomId, Timestamp},
    infrastructure::{registry::WebSocketConnectionRegistry, repository::InMemoryRoomRepository},
};

use super::JoinRoomUseCase;

pub const FIXED_NOW: i64 = 1_700_000_000_000;

pub struct Fixture {
    pub repository: Arc<InMemoryRoomRepository>,
    pub registry: Arc<WebSocketConnectionRegistry>,
    pub clock: Arc<FixedClock>,
}

/// テスト用の接続（送信キューの受信側を保持）
pub struct TestConnection {
    pub id: ConnectionId,
    rx: mpsc::Receiver<String>,
}

impl TestConnection {
    /// 既に届いているフレームを一つ取り出す
    pub fn next_frame(&mut self) -> Option<serde_json::Value> {
        self.rx
            .try_recv()
            .ok()
            .map(|text| serde_json::from_str(&text).expect("frame should be valid JSON"))
    }

    /// 届いている全てのフレームを取り出す
    pub fn drain(&mut self) -> Vec<serde_json::Value> {
        std::iter::from_fn(|| self.next_frame()).collect()
    }
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            registry: Arc::new(WebSocketConnectionRegistry::new()),
            clock: Arc::new(FixedClock::new(FIXED_NOW)),
        }
    }

    pub fn join_room_usecase(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            self.repository.clone(),
            self.registry.clone(),
            self.clock.clone(),
        )
    }

    pub async fn connect(&self) -> TestConnection {
        let (tx, rx) = mpsc::channel(64);
        let id = self.registry.register(tx, Timestamp::new(FIXED_NOW)).await;
        TestConnection { id, rx }
    }

    /// 接続してルームに参加し、参加時に届いたフレームは捨てる
    pub async fn connect_and_join(&self, room: &str, username: &str) -> TestConnection {
        let mut connection = self.connect().await;
        self.join_room_usecase()
            .execute(connection.id, room_id(room), username.into())
            .await
            .expect("join should succeed");
        connection.drain();
        connection
    }
}

pub fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).expect("room id should be valid")
}
