//! Domain entities.

use super::value_object::{
    ConnectionId, DisplayName, MessageId, MessageText, RoomId, Timestamp,
};

/// A room member as other members see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub display_name: DisplayName,
}

impl Participant {
    pub fn new(id: ConnectionId, display_name: DisplayName) -> Self {
        Self { id, display_name }
    }
}

/// Protocol state of a connection.
///
/// `Gone` is not represented: an unregistered connection has no record at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, not in any room
    #[default]
    Anonymous,
    /// Member of `room_id` under `display_name`
    Joined {
        room_id: RoomId,
        display_name: DisplayName,
    },
}

impl ConnectionState {
    pub fn room_id(&self) -> Option<&RoomId> {
        match self {
            Self::Anonymous => None,
            Self::Joined { room_id, .. } => Some(room_id),
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }
}

/// Snapshot of a live connection held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub state: ConnectionState,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            state: ConnectionState::Anonymous,
            connected_at,
        }
    }

    /// The participant this connection appears as, if it has joined a room.
    pub fn participant(&self) -> Option<Participant> {
        match &self.state {
            ConnectionState::Anonymous => None,
            ConnectionState::Joined { display_name, .. } => {
                Some(Participant::new(self.id, display_name.clone()))
            }
        }
    }
}

/// Room entity
///
/// Members are kept in join order and are unique by connection id. The room
/// stores ids and join-time labels only; live senders belong to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub members: Vec<Participant>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: Vec::new(),
            created_at,
        }
    }

    /// Add a member. A member already present keeps its position and takes
    /// the new display name.
    pub fn add_member(&mut self, participant: Participant) {
        match self.members.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => existing.display_name = participant.display_name,
            None => self.members.push(participant),
        }
    }

    /// Remove a member, returning it if it was present.
    pub fn remove_member(&mut self, id: &ConnectionId) -> Option<Participant> {
        let index = self.members.iter().position(|p| &p.id == id)?;
        Some(self.members.remove(index))
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.members.iter().any(|p| &p.id == id)
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|p| p.id).collect()
    }

    pub fn member_ids_except(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .map(|p| p.id)
            .filter(|id| id != exclude)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Chat message stamped by the relay. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: ConnectionId,
    pub sender_name: DisplayName,
    pub text: MessageText,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        sender_id: ConnectionId,
        sender_name: DisplayName,
        text: MessageText,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            sender_id,
            sender_name,
            text,
            timestamp,
        }
    }
}
