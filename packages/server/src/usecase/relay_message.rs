//! UseCase: ダイレクトメッセージの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - 永続化（Message + Notification）とライブ配信の順序
//!
//! ### なぜこのテストが必要か
//! - オフラインの受信者にも Message と Notification が 1 件ずつ残ること
//! - オンラインの受信者のセッションにだけ 2 イベントが届くこと
//! - 永続化に失敗したら何も配信しないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：受信者オンライン / オフライン
//! - 異常系：Message の保存失敗、Notification の保存失敗
//! - エッジケース：配信チャンネルが閉じている受信者

use std::sync::Arc;

use crate::domain::{
    Message, MessagePusher, MessageStore, NewMessage, NewNotification, Notification,
    OutboundEvent, PresenceRepository,
};

use super::error::RelayMessageError;

/// What happened to the live side of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Pushed to the receiver's session
    Live,
    /// Receiver not registered; stored only
    Offline,
    /// Receiver was registered but the push failed
    Dropped,
}

/// Result of a successful relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedMessage {
    pub message: Message,
    pub notification: Notification,
    pub delivery: Delivery,
}

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    presence_repository: Arc<dyn PresenceRepository>,
    store: Arc<dyn MessageStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
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

    /// Persist a message and its companion notification, then push both to
    /// the receiver if they were online.
    ///
    /// # Returns
    ///
    /// * `Ok(RelayedMessage)` - both records were written
    /// * `Err(RelayMessageError)` - a write failed; nothing was pushed
    pub async fn execute(&self, new_message: NewMessage) -> Result<RelayedMessage, RelayMessageError> {
        // 1. 受信者のセッションを解決（見つからなければオフライン）
        let receiver_session = self
            .presence_repository
            .find_session(new_message.receiver_id)
            .await;

        // 2. メッセージを永続化
        let message = self
            .store
            .create_message(new_message)
            .await
            .map_err(RelayMessageError::StoreMessage)?;

        // 3. 受信者向けの通知を永続化
        let notification = self
            .store
            .create_notification(NewNotification::for_message(&message))
            .await
            .map_err(RelayMessageError::StoreNotification)?;

        // 4. オンラインなら受信者のセッションにだけ配信
        let Some(session_id) = receiver_session else {
            tracing::debug!(
                "User {} is offline, message {} stored only",
                message.receiver_id,
                message.id.value()
            );
            return Ok(RelayedMessage {
                message,
                notification,
                delivery: Delivery::Offline,
            });
        };

        let events = [
            OutboundEvent::Message(message.clone()),
            OutboundEvent::MessageNotice {
                kind: notification.kind.clone(),
                sender_id: notification.sender_id,
                content: notification.content.clone(),
            },
        ];
        let mut delivery = Delivery::Live;
        for event in &events {
            if let Err(e) = self.message_pusher.push_to(&session_id, event).await {
                tracing::warn!(
                    "Failed to push message {} to session '{}': {}",
                    message.id.value(),
                    session_id,
                    e
                );
                delivery = Delivery::Dropped;
                break;
            }
        }

        Ok(RelayedMessage {
            message,
            notification,
            delivery,
        })
    }
}
