use roomlink_core::{ConnectionId, RoomId};

/// Registry-owned record for one live connection.
#[derive(Debug, Clone)]
pub struct ParticipantSession {
    pub connection_id: ConnectionId,
    pub display_name: String,
    /// Opaque label the client sent with its join, echoed to the room.
    pub user_id: String,
    /// If set, the named room's member list contains this session.
    pub room: Option<RoomId>,
    /// Cleared once deliveries to the connection fail.
    pub alive: bool,
}

impl ParticipantSession {
    pub(crate) fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            display_name: String::new(),
            user_id: String::new(),
            room: None,
            alive: true,
        }
    }
}
