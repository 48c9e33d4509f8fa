use crate::room::RegistryError;
use roomlink_core::{ConnectionId, MemberInfo, RoomId};
use tokio::sync::oneshot;

/// Commands the signaling layer feeds into the registry actor.
#[derive(Debug)]
pub enum RoomCommand {
    /// A transport connection opened.
    Connect { connection_id: ConnectionId },

    /// Join (or switch to) a room; replies with the membership snapshot.
    Join {
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: String,
        user_name: String,
        reply: oneshot::Sender<Result<Vec<MemberInfo>, RegistryError>>,
    },

    /// Explicit leave-room.
    Leave { connection_id: ConnectionId },

    /// Transport dropped. Replies whether this call tore the session down.
    Disconnect {
        connection_id: ConnectionId,
        reply: Option<oneshot::Sender<bool>>,
    },

    /// Chat line for the sender's current room.
    Chat {
        connection_id: ConnectionId,
        message: String,
        user_name: String,
    },

    /// Current members of a room, for inspection.
    Members {
        room_id: RoomId,
        reply: oneshot::Sender<Vec<MemberInfo>>,
    },
}
