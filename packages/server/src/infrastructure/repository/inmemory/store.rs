//! InMemory Message Store 実装
//!
//! Volatile implementation of [`MessageStore`]. Ids are assigned from
//! per-table counters starting at 1, mirroring an autoincrement column.
//! Used for development servers and tests; nothing survives a restart.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use marquee_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    InboxId, Message, MessageId, MessageStore, NewMessage, NewNotification, Notification,
    NotificationId, StoreError, Timestamp, UserId, UserProfile,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserProfile>,
    messages: Vec<Message>,
    notifications: Vec<Notification>,
    next_message_id: i64,
    next_notification_id: i64,
}

pub struct InMemoryMessageStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_message_id: 1,
                next_notification_id: 1,
                ..Tables::default()
            }),
            clock,
        }
    }

    /// Number of stored messages.
    pub async fn message_count(&self) -> usize {
        self.tables.lock().await.messages.len()
    }

    /// Number of stored notifications.
    pub async fn notification_count(&self) -> usize {
        self.tables.lock().await.notifications.len()
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn save_user(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        let mut tables = self.tables.lock().await;
        tables.users.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn create_message(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let mut tables = self.tables.lock().await;
        let sender = tables
            .users
            .get(&new_message.sender_id)
            .cloned()
            .ok_or(StoreError::UserNotFound(new_message.sender_id.value()))?;

        let message = Message {
            id: MessageId::new(tables.next_message_id),
            sender,
            receiver_id: new_message.receiver_id,
            text: new_message.text,
            inbox_id: new_message.inbox_id,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        tables.next_message_id += 1;
        tables.messages.push(message.clone());

        Ok(message)
    }

    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let mut tables = self.tables.lock().await;
        let notification = Notification {
            id: NotificationId::new(tables.next_notification_id),
            kind: new_notification.kind,
            content: new_notification.content,
            recipient_id: new_notification.recipient_id,
            sender_id: new_notification.sender_id,
            read: false,
            created_at: Timestamp::new(self.clock.now_millis()),
        };
        tables.next_notification_id += 1;
        tables.notifications.push(notification.clone());

        Ok(notification)
    }

    async fn list_inbox_messages(&self, inbox_id: InboxId) -> Result<Vec<Message>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| m.inbox_id == inbox_id)
            .cloned()
            .collect())
    }

    async fn list_notifications(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Notification>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, StoreError> {
        let mut tables = self.tables.lock().await;
        let notification = tables
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or(StoreError::NotificationNotFound(notification_id.value()))?;
        notification.read = true;
        Ok(notification.clone())
    }
}
