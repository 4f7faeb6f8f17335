//! Server configuration.
//!
//! Every option can be given as a command line flag or an environment variable.

use std::time::Duration;

use clap::Parser;

use crate::domain::{RoomCapacity, ValueObjectError};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "roomcast-server")]
#[command(about = "Real-time room/session coordinator over WebSocket", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "LISTEN_PORT", default_value_t = 3001)]
    pub listen_port: u16,

    /// Origin allowed to call the HTTP API from a browser
    #[arg(long, env = "CORS_ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub cors_allowed_origin: String,

    /// Rooms older than this are evicted at the next sweep
    #[arg(long, env = "ROOM_IDLE_TIMEOUT_MS", default_value_t = 3_600_000)]
    pub room_idle_timeout_ms: u64,

    /// Default and maximum room capacity
    #[arg(
        long,
        env = "MAX_PLAYERS_PER_ROOM",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_players_per_room: u32,

    /// Interval between idle-room sweeps
    #[arg(
        long,
        env = "REAPER_INTERVAL_MS",
        default_value_t = 3_600_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub reaper_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            listen_port: 3001,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            room_idle_timeout_ms: 3_600_000,
            max_players_per_room: 10,
            reaper_interval_ms: 3_600_000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.listen_port)
    }

    pub fn room_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.room_idle_timeout_ms)
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_millis(self.reaper_interval_ms)
    }

    pub fn max_players(&self) -> Result<RoomCapacity, ValueObjectError> {
        RoomCapacity::new(self.max_players_per_room)
    }
}
