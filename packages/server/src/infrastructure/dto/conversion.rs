//! Conversion logic from domain entities to DTOs.
//!
//! Conversions only go outward: inbound frames carry raw strings that the
//! use cases validate into value objects themselves.

use roomcast_shared::time::timestamp_to_rfc3339;

use crate::domain::{Player, Room, RoomSummary};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&Player> for ws::PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            x: player.position.x,
            y: player.position.y,
            room_id: player.room_id.as_str().to_string(),
        }
    }
}

impl From<&Room> for ws::RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            name: room.name.as_str().to_string(),
            players: room.members.iter().map(ws::PlayerSnapshot::from).collect(),
            max_players: room.capacity.value(),
            created_at: room.created_at.value(),
        }
    }
}

impl From<RoomSummary> for ws::RoomListing {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.room_id.into_string(),
            name: summary.name.into_string(),
            player_count: summary.member_count,
            max_players: summary.capacity.value(),
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            id: summary.room_id.into_string(),
            name: summary.name.into_string(),
            player_count: summary.member_count,
            max_players: summary.capacity.value(),
            created_at: timestamp_to_rfc3339(summary.created_at.value()),
        }
    }
}

impl From<Room> for http::RoomDetailDto {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.into_string(),
            name: room.name.into_string(),
            max_players: room.capacity.value(),
            players: room
                .members
                .into_iter()
                .map(|p| http::PlayerDetailDto {
                    id: p.id.into_string(),
                    name: p.name.into_string(),
                    x: p.position.x,
                    y: p.position.y,
                    joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                })
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
