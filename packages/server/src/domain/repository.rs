//! Repository trait 定義
//!
//! ドメイン層が必要とするルーム状態へのアクセスを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回のロック内で完結する「1 操作」です。複数メソッドを跨いだ
//! 一貫性が必要な処理はメソッドを追加して表現します。

use async_trait::async_trait;

use super::{
    ConnectionId, Player, RegistryError, Removal, Room, RoomId, RoomSummary, Timestamp,
    value_object::Position,
};

/// Result of a successful join
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Room snapshot including the new player
    pub room: Room,
    pub player: Player,
    /// Members other than the new player
    pub peers: Vec<ConnectionId>,
}

/// Result of a successful move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub player: Player,
    /// Members other than the mover
    pub peers: Vec<ConnectionId>,
}

/// A member looked up together with everyone in its room
#[derive(Debug, Clone, PartialEq)]
pub struct MemberContext {
    pub player: Player,
    /// All members of the room, the player included
    pub members: Vec<ConnectionId>,
}

/// Room Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create a room and add its creator as the first member.
    ///
    /// Either both steps happen or neither does.
    async fn open_room(
        &self,
        room_name: String,
        capacity: Option<u32>,
        host: ConnectionId,
        host_name: String,
        now: Timestamp,
    ) -> Result<Room, RegistryError>;

    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        player_name: String,
        now: Timestamp,
    ) -> Result<JoinOutcome, RegistryError>;

    async fn move_player(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        position: Position,
    ) -> Result<MoveOutcome, RegistryError>;

    /// Strict removal used by an explicit leave
    async fn leave_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Removal, RegistryError>;

    /// Tolerant removal used by disconnect cleanup
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<Removal>;

    async fn find_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<MemberContext, RegistryError>;

    async fn list_rooms(&self) -> Vec<RoomSummary>;

    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// Membership lookup for assertions; the gateway tracks membership itself
    #[cfg(test)]
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    async fn sweep_expired(&self, now: Timestamp, idle_timeout_millis: i64) -> Vec<Room>;
}
