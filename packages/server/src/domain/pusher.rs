//! MessagePusher trait 定義
//!
//! Outbound half of the transport: the use cases decide *what* to send and to
//! which session, implementations decide how it travels over the wire.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::OutboundEvent, value_object::SessionId};

/// Channel feeding one session's outbound writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Attach a newly accepted transport session.
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel);

    /// Detach a session; unknown ids are ignored.
    async fn unregister_session(&self, session_id: &SessionId);

    /// Push an event to exactly one session.
    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// Push an event to every attached session, registered or not.
    ///
    /// Individual send failures are tolerated; returns how many sessions
    /// accepted the event.
    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<usize, MessagePushError>;

    /// Number of attached sessions.
    async fn session_count(&self) -> usize;
}
