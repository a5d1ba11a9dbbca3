//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ConnectionId;

/// JOIN_ROOM の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// 接続が既に登録解除されている
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),
}

/// ルーム内へのリレー（チャット・状態変更）の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// 送信者がルームに参加していない
    #[error("connection '{0}' has not joined a room")]
    NotJoined(ConnectionId),
}

/// ルーム詳細取得の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
