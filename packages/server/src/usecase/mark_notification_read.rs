//! UseCase: 通知を既読にする

use std::sync::Arc;

use crate::domain::{MessageStore, Notification, NotificationId};

use super::error::MarkNotificationReadError;

pub struct MarkNotificationReadUseCase {
    store: Arc<dyn MessageStore>,
}

impl MarkNotificationReadUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, MarkNotificationReadError> {
        let notification = self.store.mark_notification_read(notification_id).await?;
        tracing::debug!("Notification {} marked as read", notification_id.value());
        Ok(notification)
    }
}
