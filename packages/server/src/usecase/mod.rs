//! UseCase layer: one struct per protocol operation.
//!
//! Use cases depend only on the domain traits (`RoomRepository`,
//! `ConnectionRegistry`) and are wired together in `ui::state::AppState`.

mod change_state;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod relay_signal;
mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use change_state::ChangeStateUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetRoomDetailError, JoinRoomError, RelayError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use send_message::SendMessageUseCase;
