//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Register presence for a user id on the current connection
    AddUser(i64),
    SendMessage(SendMessagePayload),
    SendNotification(SendNotificationPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub text: String,
    pub inbox_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationPayload {
    pub r#type: String,
    pub receiver_id: i64,
    pub sender_id: i64,
    pub content: String,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    GetOnlineUsers(Vec<ConnectedUserDto>),
    GetMessage(MessageDto),
    GetNotification(NotificationEventDto),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedUserDto {
    pub user_id: i64,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderDto {
    pub id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub text: String,
    pub inbox_id: i64,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
    pub sender: SenderDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: i64,
    pub r#type: String,
    pub content: String,
    pub recipient_id: i64,
    pub sender_id: i64,
    pub read: bool,
    /// Unix timestamp in milliseconds
    pub created_at: i64,
}

/// Notice sent alongside a relayed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationNoticeDto {
    pub r#type: String,
    pub sender_id: i64,
    pub content: String,
}

/// Payload of `getNotification`: a stored notification or a message notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationEventDto {
    // Stored must come first: a notice is a strict subset of its fields.
    Stored(NotificationDto),
    Notice(NotificationNoticeDto),
}
