//! Domain layer: rooms, players and the interfaces the outer layers implement.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{Player, Room};
pub use error::{MessagePushError, RegistryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomIdFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{Removal, RoomRegistry, RoomSummary};
pub use repository::{JoinOutcome, MemberContext, MoveOutcome, RoomRepository};
pub use value_object::{
    ChatContent, ConnectionId, PlayerName, Position, RoomCapacity, RoomId, RoomName, Timestamp,
};
