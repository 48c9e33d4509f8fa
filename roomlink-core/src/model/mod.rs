mod connection;
mod envelope;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use envelope::{IceCandidate, SdpType, SessionDescription, SignalEnvelope, SignalPayload};
pub use room::{MemberInfo, RoomId};
pub use signaling::{IceServerConfig, SignalMessage};
