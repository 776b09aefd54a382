//! UseCase: 単独通知の中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayNotificationUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 通知は必ず保存され、オンラインの受信者にだけ保存済みの通知が届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：受信者オンライン / オフライン
//! - 異常系：保存失敗

use std::sync::Arc;

use crate::domain::{
    MessagePusher, MessageStore, NewNotification, Notification, OutboundEvent,
    PresenceRepository,
};

use super::{error::RelayNotificationError, relay_message::Delivery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedNotification {
    pub notification: Notification,
    pub delivery: Delivery,
}

/// 通知中継のユースケース
pub struct RelayNotificationUseCase {
    presence_repository: Arc<dyn PresenceRepository>,
    store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayNotificationUseCase {
    pub fn new(
        presence_repository: Arc<dyn PresenceRepository>,
        store: Arc<dyn MessageStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            presence_repository,
            store,
            message_pusher,
        }
    }

    /// Persist a notification, then push it to the recipient if online.
    pub async fn execute(
        &self,
        new_notification: NewNotification,
    ) -> Result<RelayedNotification, RelayNotificationError> {
        let receiver_session = self
            .presence_repository
            .find_session(new_notification.recipient_id)
            .await;

        let notification = self.store.create_notification(new_notification).await?;

        let delivery = match receiver_session {
            None => Delivery::Offline,
            Some(session_id) => match self
                .message_pusher
                .push_to(
                    &session_id,
                    &OutboundEvent::Notification(notification.clone()),
                )
                .await
            {
                Ok(()) => Delivery::Live,
                Err(e) => {
                    tracing::warn!(
                        "Failed to push notification {} to session '{}': {}",
                        notification.id.value(),
                        session_id,
                        e
                    );
                    Delivery::Dropped
                }
            },
        };

        Ok(RelayedNotification {
            notification,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MockMessageStore, NotificationKind, PresenceRegistry, SessionId, StoreError, UserId,
        },
        infrastructure::{
            dto::websocket::{NotificationEventDto, ServerEvent},
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryMessageStore, InMemoryPresenceRepository},
        },
    };
    use tokio::sync::{Mutex, mpsc};

    fn user(id: i64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn follow_from_1_to_2() -> NewNotification {
        NewNotification {
            kind: NotificationKind::new("follow".to_string()).unwrap(),
            content: "Alice started following you".to_string(),
            recipient_id: user(2),
            sender_id: user(1),
        }
    }

    async fn setup() -> (
        Arc<InMemoryPresenceRepository>,
        Arc<WebSocketMessagePusher>,
        mpsc::UnboundedReceiver<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let presence = Arc::new(InMemoryPresenceRepository::new(Arc::new(Mutex::new(
            PresenceRegistry::default(),
        ))));
        let pusher = Arc::new(WebSocketMessagePusher::new());

        let mut receivers = Vec::new();
        for (user_id, id) in [(1, "A"), (2, "B")] {
            let session_id = SessionId::try_from(id).unwrap();
            let (tx, rx) = mpsc::unbounded_channel();
            pusher.register_session(session_id.clone(), tx).await;
            presence.register(user(user_id), session_id).await;
            receivers.push(rx);
        }
        let rx_b = receivers.pop().unwrap();
        let rx_a = receivers.pop().unwrap();
        (presence, pusher, rx_a, rx_b)
    }

    #[tokio::test]
    async fn test_relay_notification_to_online_receiver() {
        // テスト項目: 保存済みの通知が受信者のセッションにだけ届く
        // given (前提条件):
        let (presence, pusher, mut rx_a, mut rx_b) = setup().await;
        let store = Arc::new(InMemoryMessageStore::new());
        let usecase = RelayNotificationUseCase::new(presence, store.clone(), pusher);

        // when (操作):
        let relayed = usecase.execute(follow_from_1_to_2()).await.unwrap();

        // then (期待する結果):
        assert_eq!(relayed.delivery, Delivery::Live);
        assert_eq!(store.notification_count().await, 1);
        assert!(rx_a.try_recv().is_err());

        let frame = rx_b.try_recv().unwrap();
        let event: ServerEvent = serde_json::from_str(&frame).unwrap();
        let ServerEvent::GetNotification(NotificationEventDto::Stored(notification)) = event
        else {
            panic!("expected a stored notification");
        };
        assert_eq!(notification.id, relayed.notification.id.value());
        assert_eq!(notification.r#type, "follow");
        assert_eq!(notification.recipient_id, 2);
        assert!(!notification.read);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_relay_notification_to_offline_receiver() {
        // テスト項目: オフラインなら保存のみ
        // given (前提条件):
        let presence = Arc::new(InMemoryPresenceRepository::new(Arc::new(Mutex::new(
            PresenceRegistry::default(),
        ))));
        let store = Arc::new(InMemoryMessageStore::new());
        let usecase = RelayNotificationUseCase::new(
            presence,
            store.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );

        // when (操作):
        let relayed = usecase.execute(follow_from_1_to_2()).await.unwrap();

        // then (期待する結果):
        assert_eq!(relayed.delivery, Delivery::Offline);
        assert_eq!(store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn test_relay_notification_store_failure_emits_nothing() {
        // テスト項目: 保存に失敗したら配信しない
        // given (前提条件):
        let (presence, pusher, _rx_a, mut rx_b) = setup().await;
        let mut store = MockMessageStore::new();
        store
            .expect_create_notification()
            .times(1)
            .returning(|_| Err(StoreError::Backend("connection reset".to_string())));
        let usecase = RelayNotificationUseCase::new(presence, Arc::new(store), pusher);

        // when (操作):
        let result = usecase.execute(follow_from_1_to_2()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayNotificationError::Store(StoreError::Backend(
                "connection reset".to_string()
            )))
        );
        assert!(rx_b.try_recv().is_err());
    }
}
