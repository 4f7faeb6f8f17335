//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` (kebab-case) with
//! snake_case fields. Timestamps are Unix milliseconds.

use serde::{Deserialize, Serialize};

/// Frames sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    CreateRoom {
        room_name: String,
        player_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_players: Option<u32>,
    },
    JoinRoom {
        room_id: String,
        player_name: String,
    },
    PlayerMove {
        room_id: String,
        x: f64,
        y: f64,
    },
    LeaveRoom {
        room_id: String,
    },
    GetRooms,
    ChatMessage {
        room_id: String,
        content: String,
    },
}

impl ClientFrame {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerFrame {
    /// First frame on every connection; carries the caller's own player id
    Connected {
        connection_id: String,
    },
    RoomCreated {
        room_id: String,
        room: RoomSnapshot,
    },
    RoomJoined {
        room_id: String,
        room: RoomSnapshot,
    },
    PlayerJoined {
        player: PlayerSnapshot,
    },
    PlayerMoved {
        player_id: String,
        x: f64,
        y: f64,
    },
    PlayerLeft {
        player_id: String,
        player_name: String,
    },
    RoomLeft {
        room_id: String,
    },
    RoomsList {
        rooms: Vec<RoomListing>,
    },
    ChatMessage {
        room_id: String,
        player_id: String,
        player_name: String,
        content: String,
        sent_at: i64,
    },
    RoomClosed {
        room_id: String,
        reason: CloseReason,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerFrame {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            code,
            message: message.into(),
        }
    }
}

/// Full view of a room, sent to players entering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: String,
    pub name: String,
    pub players: Vec<PlayerSnapshot>,
    pub max_players: u32,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub room_id: String,
}

/// One entry of a rooms-list frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListing {
    pub id: String,
    pub name: String,
    pub player_count: usize,
    pub max_players: u32,
}

/// Stable error codes carried by error frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    RoomNotFound,
    RoomFull,
    PlayerNotFound,
    InvalidInput,
    NotInRoom,
    AlreadyInRoom,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RoomNotFound => "room-not-found",
            ErrorCode::RoomFull => "room-full",
            ErrorCode::PlayerNotFound => "player-not-found",
            ErrorCode::InvalidInput => "invalid-input",
            ErrorCode::NotInRoom => "not-in-room",
            ErrorCode::AlreadyInRoom => "already-in-room",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseReason {
    IdleTimeout,
}
