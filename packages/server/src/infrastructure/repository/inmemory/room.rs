//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` を `tokio::sync::Mutex` で保護し、各メソッドを 1 回のロック内で
//! 完結させることで、参加と容量チェックの競合などを防ぎます。
//! ロック中に I/O は行いません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, JoinOutcome, MemberContext, MoveOutcome, RegistryError, Removal, Room, RoomId,
    RoomRegistry, RoomRepository, RoomSummary, Timestamp, value_object::Position,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    registry: Arc<Mutex<RoomRegistry>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(registry: Arc<Mutex<RoomRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn open_room(
        &self,
        room_name: String,
        capacity: Option<u32>,
        host: ConnectionId,
        host_name: String,
        now: Timestamp,
    ) -> Result<Room, RegistryError> {
        let mut registry = self.registry.lock().await;

        // Reject an invalid host before registering anything
        crate::domain::PlayerName::new(host_name.clone())?;
        if let Some(current) = registry.room_of(&host) {
            return Err(RegistryError::InvalidInput(format!(
                "connection '{}' is already in room '{}'",
                host, current
            )));
        }

        let room_id = registry.create_room(room_name, capacity, now)?;
        if let Err(e) = registry.add_player(&room_id, host, host_name, Position::SPAWN, now) {
            registry.remove_room(&room_id);
            return Err(e);
        }

        registry
            .room(&room_id)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.into_string()))
    }

    async fn join_room(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        player_name: String,
        now: Timestamp,
    ) -> Result<JoinOutcome, RegistryError> {
        let mut registry = self.registry.lock().await;
        let player = registry.add_player(room_id, connection_id, player_name, Position::SPAWN, now)?;
        let room = registry
            .room(room_id)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        let peers = room
            .member_ids()
            .into_iter()
            .filter(|id| id != &player.id)
            .collect();

        Ok(JoinOutcome {
            room,
            player,
            peers,
        })
    }

    async fn move_player(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        position: Position,
    ) -> Result<MoveOutcome, RegistryError> {
        let mut registry = self.registry.lock().await;
        let player = registry.move_player(room_id, connection_id, position.x, position.y)?;
        let peers = registry
            .member_ids(room_id)
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();

        Ok(MoveOutcome { player, peers })
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Removal, RegistryError> {
        let mut registry = self.registry.lock().await;
        registry.remove_player(room_id, connection_id)
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<Removal> {
        let mut registry = self.registry.lock().await;
        registry.remove_player_if_present(connection_id)
    }

    async fn find_member(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<MemberContext, RegistryError> {
        let registry = self.registry.lock().await;
        let room = registry
            .room(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        let player = room
            .member(connection_id)
            .cloned()
            .ok_or_else(|| RegistryError::PlayerNotFound(connection_id.as_str().to_string()))?;

        Ok(MemberContext {
            player,
            members: room.member_ids(),
        })
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let registry = self.registry.lock().await;
        registry.list_rooms()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let registry = self.registry.lock().await;
        registry.room(room_id).cloned()
    }

    #[cfg(test)]
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let registry = self.registry.lock().await;
        registry.room_of(connection_id).cloned()
    }

    async fn sweep_expired(&self, now: Timestamp, idle_timeout_millis: i64) -> Vec<Room> {
        let mut registry = self.registry.lock().await;
        registry.sweep_expired(now, idle_timeout_millis)
    }
}
