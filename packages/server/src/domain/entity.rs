//! Domain entities.

use super::value_object::{
    InboxId, MessageId, MessageText, NotificationId, NotificationKind, SessionId, Timestamp,
    UserId,
};

/// A user currently holding a live, registered connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedUser {
    pub user_id: UserId,
    pub session_id: SessionId,
}

impl ConnectedUser {
    pub fn new(user_id: UserId, session_id: SessionId) -> Self {
        Self {
            user_id,
            session_id,
        }
    }
}

/// Public identity of an account, mirrored from the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

impl UserProfile {
    pub fn new(id: UserId, name: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar,
        }
    }
}

/// A direct message that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: MessageText,
    pub inbox_id: InboxId,
}

/// A persisted direct message with its resolved sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: UserProfile,
    pub receiver_id: UserId,
    pub text: MessageText,
    pub inbox_id: InboxId,
    pub created_at: Timestamp,
}

/// A notification that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub content: String,
    pub recipient_id: UserId,
    pub sender_id: UserId,
}

impl NewNotification {
    /// Companion notification written for every relayed message.
    pub fn for_message(message: &Message) -> Self {
        Self {
            kind: NotificationKind::message(),
            content: format!("{} sent you a message", message.sender.name),
            recipient_id: message.receiver_id,
            sender_id: message.sender.id,
        }
    }
}

/// A persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub content: String,
    pub recipient_id: UserId,
    pub sender_id: UserId,
    pub read: bool,
    pub created_at: Timestamp,
}
