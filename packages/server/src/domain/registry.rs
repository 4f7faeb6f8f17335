//! Room Registry: the authoritative in-memory set of rooms and their members.
//!
//! All operations are synchronous mutations without I/O. Callers are expected
//! to serialize access (see `InMemoryRoomRepository`).

use std::collections::HashMap;

use super::{
    entity::{Player, Room},
    error::RegistryError,
    factory::RoomIdFactory,
    value_object::{ConnectionId, PlayerName, Position, RoomCapacity, RoomId, RoomName, Timestamp},
};

/// Listing entry returned by [`RoomRegistry::list_rooms`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub name: RoomName,
    pub member_count: usize,
    pub capacity: RoomCapacity,
    pub created_at: Timestamp,
}

/// Result of removing a player from a room
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub player: Player,
    /// Members still in the room after the removal, in join order
    pub remaining: Vec<ConnectionId>,
    /// The room became empty and was removed from the registry
    pub room_now_empty: bool,
}

pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    /// connection -> the single room it is a member of
    membership: HashMap<ConnectionId, RoomId>,
    /// Default capacity and upper bound for requested capacities
    max_players: RoomCapacity,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomCapacity::default())
    }
}

impl RoomRegistry {
    pub fn new(max_players: RoomCapacity) -> Self {
        Self {
            rooms: HashMap::new(),
            membership: HashMap::new(),
            max_players,
        }
    }

    pub fn max_players(&self) -> RoomCapacity {
        self.max_players
    }

    /// Register a new empty room and return its id.
    ///
    /// `capacity` defaults to the registry's `max_players` and may not exceed it.
    pub fn create_room(
        &mut self,
        name: String,
        capacity: Option<u32>,
        now: Timestamp,
    ) -> Result<RoomId, RegistryError> {
        let name = RoomName::new(name)?;
        let capacity = match capacity {
            None => self.max_players,
            Some(requested) => {
                let requested = RoomCapacity::new(requested)?;
                if requested > self.max_players {
                    return Err(RegistryError::InvalidInput(format!(
                        "room capacity {} exceeds the maximum of {}",
                        requested.value(),
                        self.max_players.value()
                    )));
                }
                requested
            }
        };

        let room_id = self.allocate_room_id()?;
        self.rooms.insert(
            room_id.clone(),
            Room::new(room_id.clone(), name, capacity, now),
        );
        tracing::debug!("Room '{}' registered", room_id);
        Ok(room_id)
    }

    fn allocate_room_id(&self) -> Result<RoomId, RegistryError> {
        loop {
            let candidate = RoomIdFactory::generate()?;
            if !self.rooms.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    /// Add a connection to a room as a new player
    pub fn add_player(
        &mut self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        display_name: String,
        initial_position: Position,
        now: Timestamp,
    ) -> Result<Player, RegistryError> {
        let name = PlayerName::new(display_name)?;
        if let Some(current) = self.membership.get(&connection_id) {
            return Err(RegistryError::InvalidInput(format!(
                "connection '{}' is already in room '{}'",
                connection_id, current
            )));
        }
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;

        let player = Player::new(
            connection_id.clone(),
            name,
            initial_position,
            room_id.clone(),
            now,
        );
        room.add_player(player.clone())?;
        self.membership.insert(connection_id, room_id.clone());
        Ok(player)
    }

    /// Remove a player; fails if the room or the player is unknown.
    ///
    /// Removes the room as well when it becomes empty.
    pub fn remove_player(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<Removal, RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        let player = room.remove_player(connection_id)?;
        self.membership.remove(connection_id);

        let remaining = room.member_ids();
        let room_now_empty = room.is_empty();
        if room_now_empty {
            self.rooms.remove(room_id);
            tracing::debug!("Room '{}' removed (last member left)", room_id);
        }

        Ok(Removal {
            player,
            remaining,
            room_now_empty,
        })
    }

    /// Remove the connection from whatever room it is in, if any.
    ///
    /// Never fails: a connection that is already gone yields `None`.
    pub fn remove_player_if_present(&mut self, connection_id: &ConnectionId) -> Option<Removal> {
        let room_id = self.membership.get(connection_id)?.clone();
        match self.remove_player(&room_id, connection_id) {
            Ok(removal) => Some(removal),
            Err(e) => {
                // membership pointed at a room that no longer holds the player
                tracing::debug!("Dropping stale membership for '{}': {}", connection_id, e);
                self.membership.remove(connection_id);
                None
            }
        }
    }

    pub fn move_player(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        x: f64,
        y: f64,
    ) -> Result<Player, RegistryError> {
        let position = Position::new(x, y)?;
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.move_player(connection_id, position)
    }

    /// Snapshot of all live rooms, oldest first
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut summaries: Vec<RoomSummary> = self
            .rooms
            .values()
            .map(|room| RoomSummary {
                room_id: room.id.clone(),
                name: room.name.clone(),
                member_count: room.member_count(),
                capacity: room.capacity,
                created_at: room.created_at,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.room_id.cmp(&b.room_id))
        });
        summaries
    }

    /// Remove every room that is empty or older than `idle_timeout_millis`.
    ///
    /// Returns the removed rooms with the members they still had, so callers
    /// can notify those connections.
    pub fn sweep_expired(&mut self, now: Timestamp, idle_timeout_millis: i64) -> Vec<Room> {
        let expired: Vec<RoomId> = self
            .rooms
            .values()
            .filter(|room| room.is_empty() || room.is_expired(now, idle_timeout_millis))
            .map(|room| room.id.clone())
            .collect();

        let mut removed: Vec<Room> = expired
            .iter()
            .filter_map(|room_id| self.remove_room(room_id))
            .collect();
        removed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        removed
    }

    /// Drop a room outright, releasing its members' memberships
    pub fn remove_room(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for member in &room.members {
            self.membership.remove(&member.id);
        }
        Some(room)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The room a connection currently belongs to
    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.membership.get(connection_id)
    }

    pub fn member_ids(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(Room::member_ids)
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
