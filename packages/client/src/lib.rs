//! Roomcast client: a server-authoritative mirror of the caller's room and a
//! reconnecting terminal front end built on top of it.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod mirror;
pub mod runner;
pub mod session;
mod ui;

pub use error::ClientError;
pub use mirror::{ConnectionStatus, IntentError, MirrorEvent, SessionMirror};
pub use runner::run_client;
