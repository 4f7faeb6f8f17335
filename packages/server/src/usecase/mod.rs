//! UseCase layer: one struct per operation, orchestrating the repository,
//! the clock and the broadcast router.
//!
//! Use cases return domain outcomes; encoding frames is left to the UI layer.

pub mod broadcast;
pub mod connect_connection;
pub mod create_room;
pub mod disconnect_connection;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod list_rooms;
pub mod move_player;
pub mod reap_idle_rooms;
pub mod send_chat;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{Audience, BroadcastRouter};
pub use connect_connection::ConnectConnectionUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::GetRoomDetailError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_rooms::{GetRoomDetailUseCase, ListRoomsUseCase};
pub use move_player::MovePlayerUseCase;
pub use reap_idle_rooms::ReapIdleRoomsUseCase;
pub use send_chat::{ChatPosted, SendChatUseCase};
