//! UseCase: 通知一覧取得

use std::sync::Arc;

use crate::domain::{MessageStore, Notification, StoreError, UserId};

pub struct GetNotificationsUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetNotificationsUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Notifications addressed to `recipient_id`, newest first.
    pub async fn execute(&self, recipient_id: UserId) -> Result<Vec<Notification>, StoreError> {
        self.store.list_notifications(recipient_id).await
    }
}
