//! Domain errors.

use thiserror::Error;

/// Validation failures raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("player name must not be empty")]
    PlayerNameEmpty,

    #[error("player name is too long ({0} characters, max 20)")]
    PlayerNameTooLong(usize),

    #[error("room name must not be empty")]
    RoomNameEmpty,

    #[error("room name is too long ({0} characters, max 50)")]
    RoomNameTooLong(usize),

    #[error("chat message must not be empty")]
    ChatContentEmpty,

    #[error("chat message is too long ({0} characters, max 500)")]
    ChatContentTooLong(usize),

    #[error("room capacity must be a positive integer")]
    CapacityNotPositive,

    #[error("position coordinates must be finite numbers")]
    PositionNotFinite,
}

/// Failures of Room Registry operations.
///
/// Every variant is request-level: it is reported to the connection that issued
/// the request and never affects other connections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error("player '{0}' not found")]
    PlayerNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<ValueObjectError> for RegistryError {
    fn from(error: ValueObjectError) -> Self {
        RegistryError::InvalidInput(error.to_string())
    }
}

/// Failures while pushing frames to connections
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),
}
