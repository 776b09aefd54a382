//! UseCase: プレゼンス管理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PresenceUseCase::connect / register / disconnect
//! - presence snapshots broadcast after every register / disconnect
//!
//! ### なぜこのテストが必要か
//! - at most one registry entry per user
//! - a disconnect removes only its own session's entry
//! - every connected session, registered or not, sees the current snapshot
//!
//! ### どのような状況を想定しているか
//! - 正常系：register, then disconnect
//! - エッジケース：duplicate registration, disconnect of an unregistered session

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{
    ConnectedUser, MessagePusher, OutboundEvent, PresenceRepository, PusherChannel,
    RegisterOutcome, SessionId, UserId,
};

/// プレゼンス管理のユースケース
pub struct PresenceUseCase {
    /// Repository（プレゼンスレジストリの抽象化）
    repository: Arc<dyn PresenceRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Held across mutation and broadcast so snapshots reach sessions in
    /// mutation order.
    update_lock: Mutex<()>,
}

impl PresenceUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            update_lock: Mutex::new(()),
        }
    }

    /// Attach a freshly accepted transport session.
    ///
    /// The session receives presence broadcasts from now on, but does not
    /// appear in the registry until it registers a user.
    pub async fn connect(&self, session_id: SessionId, sender: PusherChannel) {
        self.message_pusher
            .register_session(session_id, sender)
            .await;
    }

    /// Register `user_id` on `session_id` and broadcast the snapshot.
    ///
    /// # Returns
    ///
    /// The snapshot that was broadcast.
    pub async fn register(&self, user_id: UserId, session_id: SessionId) -> Vec<ConnectedUser> {
        let _guard = self.update_lock.lock().await;

        match self.repository.register(user_id, session_id.clone()).await {
            RegisterOutcome::Added => {
                tracing::info!("User {} is online on session '{}'", user_id, session_id)
            }
            RegisterOutcome::Replaced { previous } => tracing::info!(
                "User {} moved from session '{}' to '{}'",
                user_id,
                previous,
                session_id
            ),
            RegisterOutcome::Unchanged => tracing::debug!(
                "User {} already registered, registry unchanged (session '{}')",
                user_id,
                session_id
            ),
        }

        self.broadcast_snapshot().await
    }

    /// Detach a session after its transport closed.
    ///
    /// Removes the registry entries bound to this session only, then
    /// broadcasts the snapshot to the remaining sessions.
    ///
    /// # Returns
    ///
    /// The registry entries that were removed.
    pub async fn disconnect(&self, session_id: &SessionId) -> Vec<ConnectedUser> {
        let _guard = self.update_lock.lock().await;

        self.message_pusher.unregister_session(session_id).await;
        let removed = self.repository.unregister(session_id).await;
        for entry in &removed {
            tracing::info!("User {} went offline (session '{}')", entry.user_id, session_id);
        }

        self.broadcast_snapshot().await;
        removed
    }

    /// Current registry contents.
    pub async fn online_users(&self) -> Vec<ConnectedUser> {
        self.repository.snapshot().await
    }

    async fn broadcast_snapshot(&self) -> Vec<ConnectedUser> {
        let snapshot = self.repository.snapshot().await;
        match self
            .message_pusher
            .broadcast_all(&OutboundEvent::OnlineUsers(snapshot.clone()))
            .await
        {
            Ok(delivered) => tracing::debug!(
                "Broadcasted presence snapshot ({} online) to {} session(s)",
                snapshot.len(),
                delivered
            ),
            Err(e) => tracing::warn!("Failed to broadcast presence snapshot: {}", e),
        }
        snapshot
    }
}
