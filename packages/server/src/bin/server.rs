//! Presence and messaging relay server.
//!
//! Tracks which users are online and relays direct messages and
//! notifications to their live WebSocket session, after writing them to the
//! durable store.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin marquee-server
//! cargo run --bin marquee-server -- --host 0.0.0.0 --port 3000 --store sqlite
//! ```

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use marquee_server::{
    domain::{MessageStore, PresenceRegistry, ReregistrationPolicy},
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryMessageStore, InMemoryPresenceRepository, SqliteMessageStore},
    },
    ui::{AppState, Server},
};
use marquee_shared::logger::setup_logger;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StoreKind {
    /// Volatile, lost on restart
    Memory,
    /// SQLite database at `--database-url`
    Sqlite,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Reregister {
    /// A new session takes over the user's registry entry
    Replace,
    /// The first session keeps the entry until it disconnects
    FirstWins,
}

impl From<Reregister> for ReregistrationPolicy {
    fn from(value: Reregister) -> Self {
        match value {
            Reregister::Replace => ReregistrationPolicy::Replace,
            Reregister::FirstWins => ReregistrationPolicy::FirstWins,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "marquee-server")]
#[command(about = "Presence and messaging relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "MARQUEE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Allowed cross-origin value (`*` for any)
    #[arg(long, env = "CORS_ORIGIN")]
    cors_origin: Option<String>,

    /// Durable store backend
    #[arg(long, env = "MARQUEE_STORE", value_enum, default_value = "memory")]
    store: StoreKind,

    /// SQLite database URL, used with `--store sqlite`
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite://marquee.db?mode=rwc"
    )]
    database_url: String,

    /// What happens when an online user registers from another connection
    #[arg(long, env = "MARQUEE_REREGISTER", value_enum, default_value = "replace")]
    reregister: Reregister,
}

#[tokio::main]
async fn main() {
    setup_logger(&["marquee-server", env!("CARGO_BIN_NAME")], "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository / Store
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Presence registry and durable store
    let policy = ReregistrationPolicy::from(args.reregister);
    tracing::info!("Re-registration policy: {:?}", policy);
    let registry = Arc::new(Mutex::new(PresenceRegistry::new(policy)));
    let presence_repository = Arc::new(InMemoryPresenceRepository::new(registry));

    let store: Arc<dyn MessageStore> = match args.store {
        StoreKind::Memory => {
            tracing::info!("Using in-memory store");
            Arc::new(InMemoryMessageStore::new())
        }
        StoreKind::Sqlite => match SqliteMessageStore::connect(&args.database_url).await {
            Ok(store) => {
                tracing::info!("Using SQLite store at {}", args.database_url);
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Failed to open SQLite store: {}", e);
                std::process::exit(1);
            }
        },
    };

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    let state = AppState::new(presence_repository, store, message_pusher);

    // 4. Create and run the server
    let server = Server::new(state).with_cors_origin(args.cors_origin);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
