//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - Hold the `UnboundedSender` of every accepted WebSocket session
//! - Encode domain events as `ServerEvent` JSON and push them (push_to, broadcast_all)
//!
//! ## 設計ノート
//!
//! Sockets are accepted by the UI layer (`ui/handler/websocket.rs`), which
//! creates the channel and hands its sender over here. Sessions are attached
//! from the moment the socket is accepted, before any user registers, so
//! presence snapshots also reach connections that have not sent `addUser`
//! yet.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{MessagePushError, MessagePusher, OutboundEvent, PusherChannel, SessionId},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_session(session_id.clone(), tx).await;
/// pusher.push_to(&session_id, &OutboundEvent::Message(message)).await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のセッションの sender
    sessions: Mutex<HashMap<SessionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode an event as a JSON text frame.
    pub fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        let dto: ServerEvent = event.clone().into();
        serde_json::to_string(&dto).map_err(|e| MessagePushError::Encode(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_session(&self, session_id: SessionId, sender: PusherChannel) {
        let mut sessions = self.sessions.lock().await;
        tracing::debug!("Session '{}' attached to MessagePusher", session_id);
        sessions.insert(session_id, sender);
    }

    async fn unregister_session(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(session_id).is_some() {
            tracing::debug!("Session '{}' detached from MessagePusher", session_id);
        }
    }

    async fn push_to(
        &self,
        session_id: &SessionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let frame = Self::encode(event)?;
        let sessions = self.sessions.lock().await;

        let sender = sessions
            .get(session_id)
            .ok_or_else(|| MessagePushError::SessionNotFound(session_id.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to session '{}'", session_id);
        Ok(())
    }

    async fn broadcast_all(&self, event: &OutboundEvent) -> Result<usize, MessagePushError> {
        let frame = Self::encode(event)?;
        let sessions = self.sessions.lock().await;

        let mut delivered = 0;
        for (session_id, sender) in sessions.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            match sender.send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to push event to session '{}': {}", session_id, e)
                }
            }
        }
        tracing::debug!("Broadcasted event to {} session(s)", delivered);

        Ok(delivered)
    }

    async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectedUser, UserId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: delivery to exactly one session
    // - broadcast_all: delivery to every attached session
    // - unknown and closed sessions
    // ========================================

    fn session(id: &str) -> SessionId {
        SessionId::try_from(id).unwrap()
    }

    fn online_users(ids: &[(i64, &str)]) -> OutboundEvent {
        OutboundEvent::OnlineUsers(
            ids.iter()
                .map(|(user, s)| ConnectedUser::new(UserId::new(*user).unwrap(), session(s)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: an event reaches the targeted session as JSON
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_session(session("A"), tx).await;

        // when (操作):
        let result = pusher.push_to(&session("A"), &online_users(&[(1, "A")])).await;

        // then (期待する結果):
        assert!(result.is_ok());
        let frame = rx.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(json["event"], "getOnlineUsers");
        assert_eq!(json["data"][0]["userId"], 1);
    }

    #[tokio::test]
    async fn test_push_to_other_sessions_untouched() {
        // テスト項目: push_to does not leak into other sessions
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        pusher.register_session(session("A"), tx_a).await;
        pusher.register_session(session("B"), tx_b).await;

        // when (操作):
        pusher
            .push_to(&session("B"), &online_users(&[]))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(rx_b.try_recv().is_ok());
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_to_session_not_found() {
        // テスト項目: pushing to an unknown session is an error
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&session("ghost"), &online_users(&[])).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::SessionNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_channel() {
        // テスト項目: a session whose writer is gone reports PushFailed
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_session(session("A"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&session("A"), &online_users(&[])).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_all_reaches_every_session() {
        // テスト項目: broadcast_all delivers to every attached session
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_session(session("A"), tx1).await;
        pusher.register_session(session("B"), tx2).await;

        // when (操作):
        let delivered = pusher
            .broadcast_all(&online_users(&[(1, "A")]))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await, rx2.recv().await);
    }

    #[tokio::test]
    async fn test_broadcast_all_tolerates_closed_sessions() {
        // テスト項目: a closed session does not stop the broadcast
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel::<String>();
        pusher.register_session(session("A"), tx1).await;
        pusher.register_session(session("B"), tx2).await;
        drop(rx2);

        // when (操作):
        let delivered = pusher.broadcast_all(&online_users(&[])).await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unregister_session() {
        // テスト項目: detached sessions no longer receive broadcasts
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_session(session("A"), tx).await;

        // when (操作):
        pusher.unregister_session(&session("A")).await;

        // then (期待する結果):
        assert_eq!(pusher.session_count().await, 0);
        assert_eq!(pusher.broadcast_all(&online_users(&[])).await, Ok(0));
    }
}
