//! Error types for the relay client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be turned into WebSocket and HTTP endpoints
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// The profile could not be registered with the server
    #[error("Failed to register profile: {0}")]
    Profile(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
