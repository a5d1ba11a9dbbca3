//! Room-scoped WebRTC signaling relay.
//!
//! Clients connect over WebSocket, join rooms by id, and exchange presence,
//! chat and opaque negotiation messages with the other members of their room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
