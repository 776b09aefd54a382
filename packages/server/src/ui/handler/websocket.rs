//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{NewMessage, NewNotification, SessionId, SessionIdFactory, UserId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards pushed events from `rx` to the WebSocket sink.
///
/// Ends when the channel closes or the socket refuses a frame.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionIdFactory::generate();

    // Attach the session before anything else so it sees presence snapshots
    let (tx, rx) = mpsc::unbounded_channel();
    state.presence_usecase.connect(session_id.clone(), tx).await;
    tracing::info!("Session '{}' connected", session_id);

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let session_id_clone = session_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on session '{}': {}", session_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_client_event(&state_clone, &session_id_clone, text.as_str()).await
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Session '{}' requested close", session_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward pushed events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let removed = state.presence_usecase.disconnect(&session_id).await;
    tracing::info!(
        "Session '{}' disconnected, {} registry entries removed",
        session_id,
        removed.len()
    );
}

/// Dispatch one inbound text frame.
///
/// Malformed frames and relay failures are logged and dropped; the
/// connection stays open.
async fn handle_client_event(state: &AppState, session_id: &SessionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Dropping malformed frame from session '{}': {}",
                session_id,
                e
            );
            return;
        }
    };

    match event {
        ClientEvent::AddUser(user_id) => match UserId::new(user_id) {
            Ok(user_id) => {
                state
                    .presence_usecase
                    .register(user_id, session_id.clone())
                    .await;
            }
            Err(e) => tracing::warn!("Rejected addUser from '{}': {}", session_id, e),
        },
        ClientEvent::SendMessage(payload) => {
            let new_message = match NewMessage::try_from(payload) {
                Ok(new_message) => new_message,
                Err(e) => {
                    tracing::warn!("Rejected sendMessage from '{}': {}", session_id, e);
                    return;
                }
            };
            match state.relay_message_usecase.execute(new_message).await {
                Ok(relayed) => tracing::debug!(
                    "Relayed message {} to user {} ({:?})",
                    relayed.message.id.value(),
                    relayed.message.receiver_id,
                    relayed.delivery
                ),
                Err(e) => tracing::warn!("Failed to relay message: {}", e),
            }
        }
        ClientEvent::SendNotification(payload) => {
            let new_notification = match NewNotification::try_from(payload) {
                Ok(new_notification) => new_notification,
                Err(e) => {
                    tracing::warn!("Rejected sendNotification from '{}': {}", session_id, e);
                    return;
                }
            };
            match state
                .relay_notification_usecase
                .execute(new_notification)
                .await
            {
                Ok(relayed) => tracing::debug!(
                    "Relayed notification {} to user {} ({:?})",
                    relayed.notification.id.value(),
                    relayed.notification.recipient_id,
                    relayed.delivery
                ),
                Err(e) => tracing::warn!("Failed to relay notification: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageStore, PresenceRegistry, UserProfile},
        infrastructure::{
            message_pusher::WebSocketMessagePusher,
            repository::{InMemoryMessageStore, InMemoryPresenceRepository},
        },
    };
    use tokio::sync::Mutex;

    fn create_state() -> (AppState, Arc<InMemoryMessageStore>) {
        let store = Arc::new(InMemoryMessageStore::new());
        let state = AppState::new(
            Arc::new(InMemoryPresenceRepository::new(Arc::new(Mutex::new(
                PresenceRegistry::default(),
            )))),
            store.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        );
        (state, store)
    }

    #[tokio::test]
    async fn test_add_user_registers_calling_session() {
        // テスト項目: addUser は受信したセッションでユーザーを登録する
        // given (前提条件):
        let (state, _store) = create_state();
        let session_id = SessionId::try_from("A").unwrap();

        // when (操作):
        handle_client_event(&state, &session_id, r#"{"event":"addUser","data":1}"#).await;

        // then (期待する結果):
        let online = state.presence_usecase.online_users().await;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].user_id.value(), 1);
        assert_eq!(online[0].session_id, session_id);
    }

    #[tokio::test]
    async fn test_malformed_frames_are_dropped() {
        // テスト項目: 不正なフレームは何も変更しない
        // given (前提条件):
        let (state, store) = create_state();
        let session_id = SessionId::try_from("A").unwrap();

        // when (操作):
        for frame in [
            "not json",
            r#"{"event":"unknown","data":1}"#,
            r#"{"event":"addUser","data":-3}"#,
            r#"{"event":"sendMessage","data":{"senderId":1}}"#,
            r#"{"event":"sendMessage","data":{"senderId":1,"receiverId":2,"text":"  ","inboxId":7}}"#,
        ] {
            handle_client_event(&state, &session_id, frame).await;
        }

        // then (期待する結果):
        assert!(state.presence_usecase.online_users().await.is_empty());
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn test_send_message_is_relayed() {
        // テスト項目: sendMessage はメッセージと通知を保存する
        // given (前提条件):
        let (state, store) = create_state();
        store
            .save_user(UserProfile::new(UserId::new(1).unwrap(), "Alice", None))
            .await
            .unwrap();
        let session_id = SessionId::try_from("A").unwrap();

        // when (操作):
        handle_client_event(
            &state,
            &session_id,
            r#"{"event":"sendMessage","data":{"senderId":1,"receiverId":2,"text":"hi","inboxId":7}}"#,
        )
        .await;

        // then (期待する結果):
        assert_eq!(store.message_count().await, 1);
        assert_eq!(store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn test_relay_failure_keeps_handler_alive() {
        // テスト項目: 送信者が未登録でも処理は継続し、何も保存されない
        // given (前提条件):
        let (state, store) = create_state();
        let session_id = SessionId::try_from("A").unwrap();

        // when (操作):
        handle_client_event(
            &state,
            &session_id,
            r#"{"event":"sendMessage","data":{"senderId":9,"receiverId":2,"text":"hi","inboxId":7}}"#,
        )
        .await;
        handle_client_event(
            &state,
            &session_id,
            r#"{"event":"sendNotification","data":{"type":"follow","receiverId":2,"senderId":9,"content":"hello"}}"#,
        )
        .await;

        // then (期待する結果):
        assert_eq!(store.message_count().await, 0);
        assert_eq!(store.notification_count().await, 1);
    }
}
