//! Terminal client for the Huddle signaling relay.
//!
//! Joins a room and sends each line typed at the prompt as a chat message.
//! `/mute`, `/unmute` and `/video on|off` announce media state changes,
//! `/leave` leaves the room and `/quit` exits.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-client -- --room standup --username Alice
//! cargo run --bin huddle-client -- -r standup -n Bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use huddle_client::{ClientConfig, run_client};
use huddle_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "huddle-client")]
#[command(about = "Terminal client for the Huddle signaling relay", long_about = None)]
struct Args {
    /// Room to join (created on first join)
    #[arg(short = 'r', long)]
    room: String,

    /// Display name shown to other participants
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig {
        url: args.url,
        room: args.room,
        username: args.username,
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
