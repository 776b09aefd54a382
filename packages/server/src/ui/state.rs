//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::{MessagePusher, MessageStore, PresenceRepository},
    usecase::{
        GetInboxMessagesUseCase, GetNotificationsUseCase, GetProfileUseCase,
        MarkNotificationReadUseCase, PresenceUseCase, RelayMessageUseCase,
        RelayNotificationUseCase, UpsertProfileUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// PresenceUseCase（接続・登録・切断）
    pub presence_usecase: Arc<PresenceUseCase>,
    /// RelayMessageUseCase（メッセージ中継）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// RelayNotificationUseCase（通知中継）
    pub relay_notification_usecase: Arc<RelayNotificationUseCase>,
    pub upsert_profile_usecase: Arc<UpsertProfileUseCase>,
    pub get_profile_usecase: Arc<GetProfileUseCase>,
    pub get_inbox_messages_usecase: Arc<GetInboxMessagesUseCase>,
    pub get_notifications_usecase: Arc<GetNotificationsUseCase>,
    pub mark_notification_read_usecase: Arc<MarkNotificationReadUseCase>,
}

impl AppState {
    /// Wire every use case on top of the given ports.
    pub fn new(
        presence_repository: Arc<dyn PresenceRepository>,
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_usecase: Arc::new(PresenceUseCase::new(
                presence_repository.clone(),
                message_pusher.clone(),
            )),
            relay_message_usecase: Arc::new(RelayMessageUseCase::new(
                presence_repository.clone(),
                store.clone(),
                message_pusher.clone(),
            )),
            relay_notification_usecase: Arc::new(RelayNotificationUseCase::new(
                presence_repository,
                store.clone(),
                message_pusher,
            )),
            upsert_profile_usecase: Arc::new(UpsertProfileUseCase::new(store.clone())),
            get_profile_usecase: Arc::new(GetProfileUseCase::new(store.clone())),
            get_inbox_messages_usecase: Arc::new(GetInboxMessagesUseCase::new(store.clone())),
            get_notifications_usecase: Arc::new(GetNotificationsUseCase::new(store.clone())),
            mark_notification_read_usecase: Arc::new(MarkNotificationReadUseCase::new(store)),
        }
    }
}
