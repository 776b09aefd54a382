//! Domain logic for client-side operations.
//!
//! Pure functions without side effects, kept apart from the session so they
//! can be tested directly.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_) | ClientError::Profile(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }
    current_attempt < max_attempts
}

/// Derive the HTTP API base URL from the WebSocket endpoint URL.
///
/// `ws://host:8080/ws` becomes `http://host:8080`, `wss://` maps to `https://`.
pub fn http_base_url(ws_url: &str) -> Result<String, ClientError> {
    let (scheme, rest) = if let Some(rest) = ws_url.strip_prefix("ws://") {
        ("http", rest)
    } else if let Some(rest) = ws_url.strip_prefix("wss://") {
        ("https", rest)
    } else {
        return Err(ClientError::InvalidUrl(ws_url.to_string()));
    };

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(ClientError::InvalidUrl(ws_url.to_string()));
    }

    Ok(format!("{}://{}", scheme, authority))
}
