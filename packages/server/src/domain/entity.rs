//! Entities
//!
//! `Room` は参加者（`Player`）を所有し、容量の不変条件（`|members| <= capacity`）を自身で守ります。

use serde::Serialize;

use super::{
    error::RegistryError,
    value_object::{ConnectionId, PlayerName, Position, RoomCapacity, RoomId, RoomName, Timestamp},
};

/// A connection's presence inside one room
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    /// Same value as the owning connection's id
    pub id: ConnectionId,
    pub name: PlayerName,
    pub position: Position,
    /// Non-owning back reference to the room this player belongs to
    pub room_id: RoomId,
    pub joined_at: Timestamp,
}

impl Player {
    pub fn new(
        id: ConnectionId,
        name: PlayerName,
        position: Position,
        room_id: RoomId,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            position,
            room_id,
            joined_at,
        }
    }
}

/// A named, bounded group of players
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub capacity: RoomCapacity,
    pub created_at: Timestamp,
    /// Members in join order
    pub members: Vec<Player>,
}

impl Room {
    pub fn new(id: RoomId, name: RoomName, capacity: RoomCapacity, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            capacity,
            created_at,
            members: Vec::new(),
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity.as_usize()
    }

    pub fn contains(&self, player_id: &ConnectionId) -> bool {
        self.members.iter().any(|p| &p.id == player_id)
    }

    pub fn member(&self, player_id: &ConnectionId) -> Option<&Player> {
        self.members.iter().find(|p| &p.id == player_id)
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|p| p.id.clone()).collect()
    }

    /// Whether the room has outlived `idle_timeout_millis` at `now`.
    ///
    /// Strictly greater: a room exactly `idle_timeout_millis` old is kept.
    pub fn is_expired(&self, now: Timestamp, idle_timeout_millis: i64) -> bool {
        self.created_at.elapsed_until(now) > idle_timeout_millis
    }

    /// Add a player, enforcing capacity and uniqueness
    pub fn add_player(&mut self, player: Player) -> Result<(), RegistryError> {
        if self.contains(&player.id) {
            return Err(RegistryError::InvalidInput(format!(
                "player '{}' is already in room '{}'",
                player.id, self.id
            )));
        }
        if self.is_full() {
            return Err(RegistryError::RoomFull(self.id.as_str().to_string()));
        }
        self.members.push(player);
        Ok(())
    }

    /// Remove a player and return it
    pub fn remove_player(&mut self, player_id: &ConnectionId) -> Result<Player, RegistryError> {
        let index = self
            .members
            .iter()
            .position(|p| &p.id == player_id)
            .ok_or_else(|| RegistryError::PlayerNotFound(player_id.as_str().to_string()))?;
        Ok(self.members.remove(index))
    }

    /// Update a player's position in place
    pub fn move_player(
        &mut self,
        player_id: &ConnectionId,
        position: Position,
    ) -> Result<Player, RegistryError> {
        let player = self
            .members
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| RegistryError::PlayerNotFound(player_id.as_str().to_string()))?;
        player.position = position;
        Ok(player.clone())
    }
}
