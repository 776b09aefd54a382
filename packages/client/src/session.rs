//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use marquee_server::infrastructure::dto::{
    http::{UpsertProfileRequest, UserProfileDto},
    websocket::{ClientEvent, ConnectedUserDto, ServerEvent},
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::Command,
    error::ClientError,
    formatter::MessageFormatter,
    runner::ClientConfig,
    ui::{prompt, redisplay_prompt},
};

/// Mirror the user's profile on the server so relayed messages carry it.
pub async fn register_profile(
    http: &reqwest::Client,
    http_base: &str,
    config: &ClientConfig,
) -> Result<UserProfileDto, ClientError> {
    let request = UpsertProfileRequest {
        name: config.name.clone(),
        avatar: config.avatar.clone(),
    };

    http.put(format!("{}/api/users/{}", http_base, config.user_id))
        .json(&request)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| ClientError::Profile(e.to_string()))?
        .json::<UserProfileDto>()
        .await
        .map_err(|e| ClientError::Profile(e.to_string()))
}

async fn fetch_online_users(
    http: &reqwest::Client,
    http_base: &str,
) -> Result<Vec<ConnectedUserDto>, reqwest::Error> {
    http.get(format!("{}/api/online", http_base))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

fn encode(event: &ClientEvent) -> Result<Message, serde_json::Error> {
    Ok(Message::Text(serde_json::to_string(event)?.into()))
}

/// Run one WebSocket session until the user quits or the connection drops.
pub async fn run_client_session(
    config: &ClientConfig,
    http: &reqwest::Client,
    http_base: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(&config.url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay server!");

    let (mut write, mut read) = ws_stream.split();

    // Register presence on this connection
    let add_user = encode(&ClientEvent::AddUser(config.user_id))
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    write
        .send(add_user)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    println!(
        "\nYou are '{}' (user {}). Type /help for commands. Press Ctrl+C to exit.\n",
        config.name, config.user_id
    );

    let name_for_read = config.name.clone();
    let user_id = config.user_id;

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(ServerEvent::GetOnlineUsers(users)) => {
                            MessageFormatter::format_online_users(&users, user_id)
                        }
                        Ok(ServerEvent::GetMessage(message)) => {
                            MessageFormatter::format_message(&message)
                        }
                        Ok(ServerEvent::GetNotification(notification)) => {
                            MessageFormatter::format_notification(&notification)
                        }
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_text = prompt(&config.name);

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt_text) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn prompt commands into events
    let name_for_write = config.name.clone();
    let http = http.clone();
    let http_base = http_base.to_string();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("{}", MessageFormatter::format_error(&e.to_string()));
                    redisplay_prompt(&name_for_write);
                    continue;
                }
            };

            match command {
                Command::Quit => break,
                Command::Help => print!("{}", MessageFormatter::format_help()),
                Command::Online => match fetch_online_users(&http, &http_base).await {
                    Ok(users) => print!(
                        "{}",
                        MessageFormatter::format_online_users(&users, user_id)
                    ),
                    Err(e) => print!("{}", MessageFormatter::format_error(&e.to_string())),
                },
                Command::Message { .. } | Command::Notify { .. } => {
                    let Some(event) = command.to_client_event(user_id) else {
                        continue;
                    };
                    let frame = match encode(&event) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(frame).await {
                        tracing::warn!("Failed to send event: {}", e);
                        write_error = true;
                        break;
                    }
                }
            }
            redisplay_prompt(&name_for_write);
        }

        if !write_error {
            write.close().await.ok();
        }
        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
    }

    Ok(())
}
