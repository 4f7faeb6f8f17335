//! Identifier factories.

use uuid::Uuid;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, RoomId},
};

/// Generates opaque room identifiers
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        RoomId::new(Uuid::new_v4().to_string())
    }
}

/// Generates connection identifiers at accept time
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        ConnectionId::new(Uuid::new_v4().to_string())
    }
}
