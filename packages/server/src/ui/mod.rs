//! UI layer: the axum server, the connection gateway and the idle reaper.

pub mod gateway;
mod handler;
pub mod reaper;
mod server;
mod signal;
pub mod state;

pub use gateway::{Gateway, GatewayHandle};
pub use reaper::{IdleReaper, ReaperError, ReaperHandle};
pub use server::Server;
pub use signal::shutdown_signal;
