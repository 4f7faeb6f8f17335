//! Roomcast room coordinator server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --listen-port 3001
//! LISTEN_PORT=4000 MAX_PLAYERS_PER_ROOM=4 cargo run --bin roomcast-server
//! ```

use clap::Parser;

use roomcast_server::{config::ServerConfig, ui::Server};
use roomcast_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::parse();
    tracing::debug!("Configuration: {:?}", config);

    if let Err(e) = Server::new(config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
