//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: frames exchanged over `/ws`
//! - `http`: HTTP API response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
