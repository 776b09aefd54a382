//! InMemory Presence Repository 実装
//!
//! Wraps the [`PresenceRegistry`] domain object in a mutex. Each trait method
//! is one critical section without await points inside it, so registry
//! mutations never interleave.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectedUser, PresenceRegistry, PresenceRepository, RegisterOutcome, SessionId, UserId,
};

pub struct InMemoryPresenceRepository {
    registry: Arc<Mutex<PresenceRegistry>>,
}

impl InMemoryPresenceRepository {
    pub fn new(registry: Arc<Mutex<PresenceRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn register(&self, user_id: UserId, session_id: SessionId) -> RegisterOutcome {
        let mut registry = self.registry.lock().await;
        registry.register(user_id, session_id)
    }

    async fn unregister(&self, session_id: &SessionId) -> Vec<ConnectedUser> {
        let mut registry = self.registry.lock().await;
        registry.unregister(session_id)
    }

    async fn find_session(&self, user_id: UserId) -> Option<SessionId> {
        let registry = self.registry.lock().await;
        registry.session_of(user_id).cloned()
    }

    async fn snapshot(&self) -> Vec<ConnectedUser> {
        let registry = self.registry.lock().await;
        registry.snapshot()
    }
}
