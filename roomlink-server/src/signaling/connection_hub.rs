use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use dashmap::DashMap;
use roomlink_core::{ConnectionId, SignalMessage};
use tokio::sync::mpsc;

/// Outbound queue of every live connection, keyed by connection id.
#[derive(Default)]
pub struct ConnectionHub {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<SignalMessage>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_peer(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<SignalMessage>) {
        self.peers.insert(connection_id, tx);
    }

    pub fn remove_peer(&self, connection_id: &ConnectionId) {
        self.peers.remove(connection_id);
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.peers.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Non-blocking enqueue; `false` when the peer is gone or its writer stopped.
    pub fn send(&self, connection_id: &ConnectionId, msg: SignalMessage) -> bool {
        let Some(peer) = self.peers.get(connection_id) else {
            return false;
        };
        peer.send(msg).is_ok()
    }
}

#[async_trait]
impl SignalingOutput for ConnectionHub {
    async fn deliver(&self, to: ConnectionId, msg: SignalMessage) -> bool {
        self.send(&to, msg)
    }
}
