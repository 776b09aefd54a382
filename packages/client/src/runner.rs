//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{http_base_url, should_attempt_reconnect},
    session::{register_profile, run_client_session},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Who the client is and where it connects.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    pub user_id: i64,
    pub name: String,
    pub avatar: Option<String>,
}

/// Run the relay client with reconnection logic
///
/// Every reconnect registers presence again on the new connection.
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let http_base = http_base_url(&config.url)?;
    let http = reqwest::Client::new();

    let profile = register_profile(&http, &http_base, &config).await?;
    tracing::info!("Profile registered as '{}' (user {})", profile.name, profile.id);

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as user {} (attempt {}/{})",
            config.url,
            config.user_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&config, &http, &http_base).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        reconnect_count
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
