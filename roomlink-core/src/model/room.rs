use crate::ProtocolError;
use crate::model::ConnectionId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const GENERATED_ID_PREFIX: &str = "room-";
const GENERATED_ID_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque, caller-chosen room name. Never empty.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Result<Self, ProtocolError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ProtocolError::EmptyRoomId);
        }
        Ok(Self(id))
    }

    /// A fresh `room-xxxxxxxxx` identifier for callers that do not bring one.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..GENERATED_ID_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{GENERATED_ID_PREFIX}{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the membership snapshot handed to a joiner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub socket_id: ConnectionId,
    pub user_name: String,
}
