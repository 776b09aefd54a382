//! Repository trait 定義
//!
//! Data-access ports of the relay. The use case layer depends on these traits
//! only; the infrastructure layer provides in-memory and SQLite
//! implementations (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ConnectedUser, Message, NewMessage, NewNotification, Notification, UserProfile},
    error::StoreError,
    presence::RegisterOutcome,
    value_object::{InboxId, NotificationId, SessionId, UserId},
};

/// Access to the process-local presence registry.
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Register `user_id` on `session_id` according to the registry policy.
    async fn register(&self, user_id: UserId, session_id: SessionId) -> RegisterOutcome;

    /// Remove every entry bound to `session_id` and return the removed entries.
    async fn unregister(&self, session_id: &SessionId) -> Vec<ConnectedUser>;

    /// Live session of `user_id`, if registered.
    async fn find_session(&self, user_id: UserId) -> Option<SessionId>;

    /// Current registry contents in registration order.
    async fn snapshot(&self) -> Vec<ConnectedUser>;
}

/// Durable storage of profiles, messages and notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert or replace a user profile.
    async fn save_user(&self, profile: UserProfile) -> Result<UserProfile, StoreError>;

    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Persist a message; the returned message carries the resolved sender.
    ///
    /// Fails with [`StoreError::UserNotFound`] when the sender has no profile.
    async fn create_message(&self, new_message: NewMessage) -> Result<Message, StoreError>;

    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, StoreError>;

    /// Messages of an inbox, oldest first.
    async fn list_inbox_messages(&self, inbox_id: InboxId) -> Result<Vec<Message>, StoreError>;

    /// Notifications of a recipient, newest first.
    async fn list_notifications(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Notification>, StoreError>;

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, StoreError>;
}
