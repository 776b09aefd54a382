//! SQLite Message Store 実装
//!
//! Durable [`MessageStore`] backed by `sqlx`. The schema is created on
//! connect; every statement is a runtime query so no database is needed at
//! build time.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use marquee_shared::time::{Clock, SystemClock};
use sqlx::{
    FromRow,
    sqlite::{SqlitePool, SqlitePoolOptions},
};

use crate::domain::{
    InboxId, Message, MessageId, MessageStore, MessageText, NewMessage, NewNotification,
    Notification, NotificationId, NotificationKind, StoreError, Timestamp, UserId, UserProfile,
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        avatar TEXT
    )",
    "CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sender_id INTEGER NOT NULL REFERENCES users(id),
        receiver_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        inbox_id INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_messages_inbox ON messages (inbox_id, id)",
    "CREATE TABLE IF NOT EXISTS notifications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL,
        content TEXT NOT NULL,
        recipient_id INTEGER NOT NULL,
        sender_id INTEGER NOT NULL,
        is_read BOOLEAN NOT NULL DEFAULT FALSE,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_notifications_recipient ON notifications (recipient_id, id)",
];

const SELECT_MESSAGES: &str = "SELECT m.id, m.sender_id, m.receiver_id, m.text, m.inbox_id, \
     m.created_at, u.name AS sender_name, u.avatar AS sender_avatar \
     FROM messages m JOIN users u ON u.id = m.sender_id";

const SELECT_NOTIFICATIONS: &str = "SELECT id, kind, content, recipient_id, sender_id, is_read, \
     created_at FROM notifications";

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn corrupt(e: impl std::fmt::Display) -> StoreError {
    StoreError::CorruptRow(e.to_string())
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: String,
    avatar: Option<String>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserProfile::new(
            UserId::new(row.id).map_err(corrupt)?,
            row.name,
            row.avatar,
        ))
    }
}

#[derive(FromRow)]
struct MessageRow {
    id: i64,
    sender_id: i64,
    receiver_id: i64,
    text: String,
    inbox_id: i64,
    created_at: i64,
    sender_name: String,
    sender_avatar: Option<String>,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: MessageId::new(row.id),
            sender: UserProfile::new(
                UserId::new(row.sender_id).map_err(corrupt)?,
                row.sender_name,
                row.sender_avatar,
            ),
            receiver_id: UserId::new(row.receiver_id).map_err(corrupt)?,
            text: MessageText::new(row.text).map_err(corrupt)?,
            inbox_id: InboxId::new(row.inbox_id).map_err(corrupt)?,
            created_at: Timestamp::new(row.created_at),
        })
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: i64,
    kind: String,
    content: String,
    recipient_id: i64,
    sender_id: i64,
    is_read: bool,
    created_at: i64,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = StoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: NotificationId::new(row.id),
            kind: NotificationKind::new(row.kind).map_err(corrupt)?,
            content: row.content,
            recipient_id: UserId::new(row.recipient_id).map_err(corrupt)?,
            sender_id: UserId::new(row.sender_id).map_err(corrupt)?,
            read: row.is_read,
            created_at: Timestamp::new(row.created_at),
        })
    }
}

#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteMessageStore {
    /// Connect to `database_url` (e.g. `sqlite://marquee.db?mode=rwc`) and
    /// create the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::connect_with_clock(database_url, Arc::new(SystemClock)).await
    }

    pub async fn connect_with_clock(
        database_url: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StoreError> {
        // An in-memory database lives and dies with its connection.
        let in_memory = database_url.contains(":memory:");
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = options.connect(database_url).await.map_err(backend)?;

        let store = Self { pool, clock };
        store.migrate().await?;
        tracing::info!("SQLite message store ready at {}", database_url);
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(backend)?;
        }
        Ok(())
    }

    async fn fetch_notification(
        &self,
        notification_id: NotificationId,
    ) -> Result<Option<Notification>, StoreError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "{SELECT_NOTIFICATIONS} WHERE id = ?"
        ))
        .bind(notification_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Notification::try_from).transpose()
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn save_user(&self, profile: UserProfile) -> Result<UserProfile, StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, avatar) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET name = excluded.name, avatar = excluded.avatar",
        )
        .bind(profile.id.value())
        .bind(&profile.name)
        .bind(profile.avatar.as_deref())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(profile)
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, name, avatar FROM users WHERE id = ?")
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn create_message(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let sender = self
            .find_user(new_message.sender_id)
            .await?
            .ok_or(StoreError::UserNotFound(new_message.sender_id.value()))?;
        let created_at = Timestamp::new(self.clock.now_millis());

        let result = sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, text, inbox_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(sender.id.value())
        .bind(new_message.receiver_id.value())
        .bind(new_message.text.as_str())
        .bind(new_message.inbox_id.value())
        .bind(created_at.value())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(Message {
            id: MessageId::new(result.last_insert_rowid()),
            sender,
            receiver_id: new_message.receiver_id,
            text: new_message.text,
            inbox_id: new_message.inbox_id,
            created_at,
        })
    }

    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification, StoreError> {
        let created_at = Timestamp::new(self.clock.now_millis());

        let result = sqlx::query(
            "INSERT INTO notifications (kind, content, recipient_id, sender_id, is_read, created_at) \
             VALUES (?, ?, ?, ?, FALSE, ?)",
        )
        .bind(new_notification.kind.as_str())
        .bind(&new_notification.content)
        .bind(new_notification.recipient_id.value())
        .bind(new_notification.sender_id.value())
        .bind(created_at.value())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(Notification {
            id: NotificationId::new(result.last_insert_rowid()),
            kind: new_notification.kind,
            content: new_notification.content,
            recipient_id: new_notification.recipient_id,
            sender_id: new_notification.sender_id,
            read: false,
            created_at,
        })
    }

    async fn list_inbox_messages(&self, inbox_id: InboxId) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query_as::<_, MessageRow>(&format!(
            "{SELECT_MESSAGES} WHERE m.inbox_id = ? ORDER BY m.id ASC"
        ))
        .bind(inbox_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn list_notifications(
        &self,
        recipient_id: UserId,
    ) -> Result<Vec<Notification>, StoreError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "{SELECT_NOTIFICATIONS} WHERE recipient_id = ? ORDER BY id DESC"
        ))
        .bind(recipient_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<Notification, StoreError> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?")
            .bind(notification_id.value())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotificationNotFound(notification_id.value()));
        }

        self.fetch_notification(notification_id)
            .await?
            .ok_or(StoreError::NotificationNotFound(notification_id.value()))
    }
}
