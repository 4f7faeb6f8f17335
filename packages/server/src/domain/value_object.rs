//! Value Objects
//!
//! 入力値の検証はすべてここで行い、生成済みの値オブジェクトは常に有効であることを保証します。

use serde::{Deserialize, Serialize};

use super::error::ValueObjectError;

/// Maximum length of a player display name (in characters)
pub const PLAYER_NAME_MAX_CHARS: usize = 20;

/// Maximum length of a room display name (in characters)
pub const ROOM_NAME_MAX_CHARS: usize = 50;

/// Maximum length of a chat message (in characters)
pub const CHAT_CONTENT_MAX_CHARS: usize = 500;

/// Default number of players a room accepts
pub const DEFAULT_ROOM_CAPACITY: u32 = 10;

/// Opaque identity of one transport session. Doubles as the player id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-generated room identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims `value` and checks it is non-empty and at most `max_chars` characters.
fn validated_name(
    value: String,
    max_chars: usize,
    empty: ValueObjectError,
    too_long: fn(usize) -> ValueObjectError,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    let length = trimmed.chars().count();
    if length > max_chars {
        return Err(too_long(length));
    }
    Ok(trimmed.to_string())
}

/// Display name chosen by the player (1..=20 characters)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated_name(
            value,
            PLAYER_NAME_MAX_CHARS,
            ValueObjectError::PlayerNameEmpty,
            ValueObjectError::PlayerNameTooLong,
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Display name of a room (1..=50 characters)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validated_name(
            value,
            ROOM_NAME_MAX_CHARS,
            ValueObjectError::RoomNameEmpty,
            ValueObjectError::RoomNameTooLong,
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Chat message body (1..=500 characters, not trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContent(String);

impl ChatContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::ChatContentEmpty);
        }
        let length = value.chars().count();
        if length > CHAT_CONTENT_MAX_CHARS {
            return Err(ValueObjectError::ChatContentTooLong(length));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ChatContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum number of players in one room (always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCapacity(u32);

impl RoomCapacity {
    pub fn new(value: u32) -> Result<Self, ValueObjectError> {
        if value == 0 {
            return Err(ValueObjectError::CapacityNotPositive);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl Default for RoomCapacity {
    fn default() -> Self {
        Self(DEFAULT_ROOM_CAPACITY)
    }
}

/// Last known position of a player in the 2D scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Where newly created or joined players appear (center of the 800x600 scene)
    pub const SPAWN: Position = Position { x: 400.0, y: 300.0 };

    pub fn new(x: f64, y: f64) -> Result<Self, ValueObjectError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValueObjectError::PositionNotFinite);
        }
        Ok(Self { x, y })
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` until `now` (negative if `now` is earlier)
    pub fn elapsed_until(&self, now: Timestamp) -> i64 {
        now.0.saturating_sub(self.0)
    }
}
