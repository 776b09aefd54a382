//! UseCase error types.

use thiserror::Error;

use crate::domain::StoreError;

/// `RelayMessageUseCase` のエラー
///
/// Either write failing aborts the relay before anything is pushed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayMessageError {
    #[error("failed to store message: {0}")]
    StoreMessage(StoreError),

    #[error("failed to store message notification: {0}")]
    StoreNotification(StoreError),
}

/// `RelayNotificationUseCase` のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayNotificationError {
    #[error("failed to store notification: {0}")]
    Store(#[from] StoreError),
}

/// Profile lookup / upsert errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("user {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `MarkNotificationReadUseCase` のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkNotificationReadError {
    #[error("notification {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for MarkNotificationReadError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotificationNotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
