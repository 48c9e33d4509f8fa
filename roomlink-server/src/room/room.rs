use roomlink_core::{ConnectionId, RoomId};

/// Membership of one room, in join order.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: Vec<ConnectionId>,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn insert(&mut self, connection_id: ConnectionId) {
        if !self.contains(&connection_id) {
            self.members.push(connection_id);
        }
    }

    pub(crate) fn remove(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != connection_id);
        before != self.members.len()
    }

    /// Everyone except `connection_id`.
    pub fn others(&self, connection_id: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|m| *m != connection_id)
            .copied()
            .collect()
    }
}
