//! Error types for the Roomcast client.

use thiserror::Error;

/// Errors that end a client session
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL can never be connected to
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server closed the socket or a read/write failed
    #[error("Connection lost")]
    ConnectionLost,
}
