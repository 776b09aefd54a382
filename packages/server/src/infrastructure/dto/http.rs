//! HTTP API request/response DTOs.
//!
//! Messages and notifications reuse the WebSocket DTOs so that a client sees
//! the same shape live and on fetch.

use serde::{Deserialize, Serialize};

pub use super::websocket::{ConnectedUserDto, MessageDto, NotificationDto};

/// Body of `PUT /api/users/{user_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertProfileRequest {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileDto {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
