//! WebRTC signaling relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin huddle-server
//! cargo run --bin huddle-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 cargo run --bin huddle-server
//! ```

use std::sync::Arc;

use clap::Parser;
use huddle_server::{
    infrastructure::{registry::WebSocketConnectionRegistry, repository::InMemoryRoomRepository},
    ui::{AppState, Server, ServerConfig},
};
use huddle_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "huddle-server")]
#[command(about = "Room-scoped WebRTC signaling relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HUDDLE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Capacity of each connection's outbound queue; frames beyond it are dropped
    #[arg(long, env = "HUDDLE_OUTBOUND_BUFFER", default_value = "256")]
    outbound_buffer: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig::from(args);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. ConnectionRegistry
    // 3. UseCases (AppState)
    // 4. Server
    let repository = Arc::new(InMemoryRoomRepository::new());
    let registry = Arc::new(WebSocketConnectionRegistry::new());
    let state = Arc::new(AppState::new(
        repository,
        registry,
        Arc::new(SystemClock),
        config.outbound_buffer,
    ));

    let server = Server::new(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
