use roomlink_core::{ConnectionId, SignalMessage};
use async_trait::async_trait;

/// Outbound side of the signaling transport, as seen by the room registry.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue `msg` for one connection. Returns `false` if it is not connected.
    async fn deliver(&self, to: ConnectionId, msg: SignalMessage) -> bool;
}
