//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    cors::build_cors_layer,
    handler::{
        get_inbox_messages, get_notifications, get_online_users, get_profile, health_check,
        mark_notification_read, upsert_profile, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Presence and messaging relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(AppState::new(presence_repository, store, message_pusher))
///     .with_cors_origin(Some("*".to_string()));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    cors_origin: Option<String>,
    /// Routes served next to the relay's own (e.g. a page renderer)
    extra_routes: Option<Router>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
            cors_origin: None,
            extra_routes: None,
        }
    }

    /// Allow cross-origin requests from `origin` (`*` for any).
    pub fn with_cors_origin(mut self, origin: Option<String>) -> Self {
        self.cors_origin = origin;
        self
    }

    /// Attach extra HTTP routes. They must not collide with `/ws` or `/api/*`.
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.extra_routes = Some(match self.extra_routes.take() {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Build the router without binding a socket.
    pub fn router(&self) -> Router {
        let mut app: Router = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/online", get(get_online_users))
            .route("/api/users/{user_id}", get(get_profile).put(upsert_profile))
            .route(
                "/api/users/{user_id}/notifications",
                get(get_notifications),
            )
            .route("/api/inboxes/{inbox_id}/messages", get(get_inbox_messages))
            .route(
                "/api/notifications/{notification_id}/read",
                post(mark_notification_read),
            )
            .with_state(self.state.clone());

        if let Some(routes) = &self.extra_routes {
            app = app.merge(routes.clone());
        }

        if let Some(cors) = self.cors_origin.as_deref().and_then(build_cors_layer) {
            app = app.layer(cors);
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Run the relay server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
