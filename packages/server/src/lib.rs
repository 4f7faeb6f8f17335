//! Real-time room/session coordinator.
//!
//! Clients connect over WebSocket, create or join bounded rooms, and exchange
//! position and chat events with the other members of their room. Idle rooms
//! are evicted by a periodic reaper.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
