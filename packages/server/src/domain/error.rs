//! Domain error types.

use thiserror::Error;

/// Validation failures when building value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must be positive (got {0})")]
    InvalidUserId(i64),

    #[error("inbox id must be positive (got {0})")]
    InvalidInboxId(i64),

    #[error("session id must not be empty")]
    EmptySessionId,

    #[error("message text must not be empty")]
    EmptyMessageText,

    #[error("message text is too long ({actual} > {max} characters)")]
    MessageTextTooLong { actual: usize, max: usize },

    #[error("notification kind must not be empty")]
    EmptyNotificationKind,
}

/// Failures reported by the durable store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    UserNotFound(i64),

    #[error("notification {0} not found")]
    NotificationNotFound(i64),

    #[error("stored row is invalid: {0}")]
    CorruptRow(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Failures when pushing an event to a live session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("session '{0}' is not connected")]
    SessionNotFound(String),

    #[error("failed to push to session: {0}")]
    PushFailed(String),

    #[error("failed to encode event: {0}")]
    Encode(String),
}
