use crate::ProtocolError;
use crate::model::{ConnectionId, MemberInfo, RoomId, SignalEnvelope};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: Vec<String>) -> Self {
        Self {
            urls,
            username: None,
            credential: None,
        }
    }
}

/// Every message exchanged between a participant and the signaling server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalMessage {
    /// server → client, first message on a fresh connection.
    Welcome { connection_id: ConnectionId },

    /// server → client, servers the client should use for its peer links.
    IceConfig { ice_servers: Vec<IceServerConfig> },

    /// client → server
    JoinRoom {
        room_id: RoomId,
        #[serde(default)]
        user_id: String,
        user_name: String,
    },

    /// server → joiner, members present before the join.
    ExistingUsers { users: Vec<MemberInfo> },

    /// server → everyone else in the room
    UserJoined {
        user_id: String,
        user_name: String,
        socket_id: ConnectionId,
    },

    /// client → server → client
    Signal(SignalEnvelope),

    /// server → remaining members
    UserLeft {
        user_id: ConnectionId,
        socket_id: ConnectionId,
    },

    /// client → server
    LeaveRoom,

    /// client → server, chat line for the sender's current room.
    SendMessage {
        #[serde(default)]
        room_id: Option<String>,
        message: String,
        user_name: String,
    },

    /// server → room members other than the sender
    ReceiveMessage {
        message: String,
        user_name: String,
        time: String,
    },
}

impl SignalMessage {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn op(&self) -> &'static str {
        match self {
            SignalMessage::Welcome { .. } => "welcome",
            SignalMessage::IceConfig { .. } => "ice-config",
            SignalMessage::JoinRoom { .. } => "join-room",
            SignalMessage::ExistingUsers { .. } => "existing-users",
            SignalMessage::UserJoined { .. } => "user-joined",
            SignalMessage::Signal(_) => "signal",
            SignalMessage::UserLeft { .. } => "user-left",
            SignalMessage::LeaveRoom => "leave-room",
            SignalMessage::SendMessage { .. } => "send-message",
            SignalMessage::ReceiveMessage { .. } => "receive-message",
        }
    }
}
