//! Shared application state.

use std::sync::Arc;

use huddle_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, RoomRepository},
    usecase::{
        ChangeStateUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RelaySignalUseCase, SendMessageUseCase,
    },
};

/// Shared application state
///
/// Holds one instance of every use case, all wired to the same repository and registry.
pub struct AppState {
    /// ConnectParticipantUseCase（接続受付のユースケース）
    pub connect_participant_usecase: ConnectParticipantUseCase,
    /// DisconnectParticipantUseCase（切断処理のユースケース）
    pub disconnect_participant_usecase: DisconnectParticipantUseCase,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: JoinRoomUseCase,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: LeaveRoomUseCase,
    /// RelaySignalUseCase（シグナル中継のユースケース）
    pub relay_signal_usecase: RelaySignalUseCase,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: SendMessageUseCase,
    /// ChangeStateUseCase（状態変更通知のユースケース）
    pub change_state_usecase: ChangeStateUseCase,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: GetRoomsUseCase,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: GetRoomDetailUseCase,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
}

impl AppState {
    /// Wire every use case to the given repository, registry and clock.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        outbound_buffer: usize,
    ) -> Self {
        Self {
            connect_participant_usecase: ConnectParticipantUseCase::new(
                registry.clone(),
                clock.clone(),
            ),
            disconnect_participant_usecase: DisconnectParticipantUseCase::new(
                repository.clone(),
                registry.clone(),
            ),
            join_room_usecase: JoinRoomUseCase::new(
                repository.clone(),
                registry.clone(),
                clock.clone(),
            ),
            leave_room_usecase: LeaveRoomUseCase::new(repository.clone(), registry.clone()),
            relay_signal_usecase: RelaySignalUseCase::new(repository.clone(), registry.clone()),
            send_message_usecase: SendMessageUseCase::new(
                repository.clone(),
                registry.clone(),
                clock,
            ),
            change_state_usecase: ChangeStateUseCase::new(repository.clone(), registry),
            get_rooms_usecase: GetRoomsUseCase::new(repository.clone()),
            get_room_detail_usecase: GetRoomDetailUseCase::new(repository),
            // mpsc::channel panics on zero capacity
            outbound_buffer: outbound_buffer.max(1),
        }
    }
}
