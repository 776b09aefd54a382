//! Command-line client for the Marquee presence and messaging relay.
//!
//! Registers the user's profile, connects, announces presence with `addUser`
//! and reads commands from a prompt. Reconnects on disconnection (max 5
//! attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin marquee-client -- --user-id 1 --name Alice
//! cargo run --bin marquee-client -- -i 2 -n Bob --url ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;
use marquee_client::{ClientConfig, run_client};
use marquee_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "marquee-client")]
#[command(about = "CLI client for the Marquee presence and messaging relay", long_about = None)]
struct Args {
    /// Application user id to register presence for
    #[arg(short = 'i', long)]
    user_id: i64,

    /// Display name shown to message receivers
    #[arg(short = 'n', long)]
    name: String,

    /// Avatar URL shown to message receivers
    #[arg(short = 'a', long)]
    avatar: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "MARQUEE_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(&["marquee-client", env!("CARGO_BIN_NAME")], "info");

    let args = Args::parse();

    let config = ClientConfig {
        url: args.url,
        user_id: args.user_id,
        name: args.name,
        avatar: args.avatar,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
