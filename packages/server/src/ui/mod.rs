//! UI layer: axum router, HTTP and WebSocket handlers, server lifecycle.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, router};
pub use signal::shutdown_signal;
pub use state::AppState;
