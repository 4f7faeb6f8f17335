//! HTTP API response DTOs.
//!
//! Timestamps are RFC 3339 strings.

use serde::{Deserialize, Serialize};

/// `GET /api/rooms` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    pub player_count: usize,
    pub max_players: u32,
    pub created_at: String,
}

/// `GET /api/rooms/{room_id}` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub name: String,
    pub max_players: u32,
    pub players: Vec<PlayerDetailDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetailDto {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub joined_at: String,
}
