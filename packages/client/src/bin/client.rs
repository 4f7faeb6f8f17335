//! Roomcast terminal client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-client -- --name alice
//! cargo run --bin roomcast-client -- --url ws://127.0.0.1:3001/ws --name bob
//! ```

use clap::Parser;

use roomcast_client::run_client;
use roomcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomcast-client")]
#[command(about = "Terminal client for Roomcast rooms", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short, long, default_value = "ws://127.0.0.1:3001/ws")]
    url: String,

    /// Display name used when creating or joining rooms
    #[arg(short, long)]
    name: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
