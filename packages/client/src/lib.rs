//! Terminal client for the Huddle signaling relay.
//!
//! Joins one room, prints presence, chat and state events, and sends chat
//! messages and media state changes typed at the prompt. It has no media
//! engine, so relayed signals are shown but never answered.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientConfig, run_client};
