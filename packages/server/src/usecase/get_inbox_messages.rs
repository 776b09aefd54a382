//! UseCase: 受信箱のメッセージ一覧取得

use std::sync::Arc;

use crate::domain::{InboxId, Message, MessageStore, StoreError};

/// 受信箱のメッセージ一覧取得のユースケース
///
/// Offline receivers catch up through this listing.
pub struct GetInboxMessagesUseCase {
    store: Arc<dyn MessageStore>,
}

impl GetInboxMessagesUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Messages of `inbox_id`, oldest first.
    pub async fn execute(&self, inbox_id: InboxId) -> Result<Vec<Message>, StoreError> {
        self.store.list_inbox_messages(inbox_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageText, NewMessage, UserId, UserProfile},
        infrastructure::repository::InMemoryMessageStore,
    };

    #[tokio::test]
    async fn test_offline_receiver_catches_up_from_inbox() {
        // テスト項目: 保存済みのメッセージが受信箱から取得できる
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let alice = UserId::new(1).unwrap();
        store
            .save_user(UserProfile::new(alice, "Alice", None))
            .await
            .unwrap();
        for text in ["hi", "are you there?"] {
            store
                .create_message(NewMessage {
                    sender_id: alice,
                    receiver_id: UserId::new(2).unwrap(),
                    text: MessageText::new(text.to_string()).unwrap(),
                    inbox_id: InboxId::new(7).unwrap(),
                })
                .await
                .unwrap();
        }
        let usecase = GetInboxMessagesUseCase::new(store);

        // when (操作):
        let messages = usecase.execute(InboxId::new(7).unwrap()).await.unwrap();
        let empty = usecase.execute(InboxId::new(8).unwrap()).await.unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "are you there?"]);
        assert!(empty.is_empty());
    }
}
