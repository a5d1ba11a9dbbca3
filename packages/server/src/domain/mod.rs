//! Domain layer: entities, value objects and the interfaces the relay needs.
//!
//! The domain layer depends on nothing but itself. Storage and delivery are
//! expressed as traits (`RoomRepository`, `ConnectionRegistry`) and implemented
//! by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, ConnectionState, Participant, Room};
pub use error::ValueObjectError;
pub use event::RelayEvent;
pub use registry::{ConnectionRegistry, Delivery, OutboundChannel};
pub use repository::{Departure, RoomRepository};
pub use value_object::{
    ConnectionId, DisplayName, MessageId, MessageText, OpaquePayload, RoomId, Timestamp,
};

#[cfg(test)]
pub use registry::MockConnectionRegistry;
