use crate::room::{RegistryError, RoomManager};
use crate::signaling::ConnectionHub;
use roomlink_core::{ConnectionId, IceServerConfig, SignalEnvelope, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct SignalingInner {
    hub: Arc<ConnectionHub>,
    ice_servers: Vec<IceServerConfig>,
}

/// Front door of the server: connection bookkeeping, relay and dispatch of
/// client messages to the room registry.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    rooms: RoomManager,
}

impl SignalingService {
    /// Spawns the room registry and wires it to a fresh connection hub.
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        let hub = Arc::new(ConnectionHub::new());
        let rooms = RoomManager::spawn(hub.clone());

        Self {
            inner: Arc::new(SignalingInner { hub, ice_servers }),
            rooms,
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn hub(&self) -> &ConnectionHub {
        &self.inner.hub
    }

    /// Registers a live connection and greets it with its id and ICE servers.
    pub async fn connect(
        &self,
        connection_id: ConnectionId,
        tx: mpsc::UnboundedSender<SignalMessage>,
    ) -> Result<(), RegistryError> {
        self.inner.hub.add_peer(connection_id, tx);
        self.rooms.connect(connection_id).await?;

        self.inner
            .hub
            .send(&connection_id, SignalMessage::Welcome { connection_id });
        self.inner.hub.send(
            &connection_id,
            SignalMessage::IceConfig {
                ice_servers: self.get_ice_servers(),
            },
        );
        Ok(())
    }

    /// Tears the connection down. Only the first call has any effect.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        self.inner.hub.remove_peer(&connection_id);
        match self.rooms.disconnect(connection_id).await {
            Ok(torn_down) => torn_down,
            Err(e) => {
                warn!("Disconnect of {} not recorded: {}", connection_id, e);
                false
            }
        }
    }

    /// Forwards `envelope` to `envelope.to`, with `from` forced to `sender`.
    /// A recipient that is not connected is not an error.
    pub fn relay(&self, sender: ConnectionId, mut envelope: SignalEnvelope) -> bool {
        envelope.from = Some(sender);
        let to = envelope.to;
        let kind = envelope.payload.kind();

        let delivered = self.inner.hub.send(&to, SignalMessage::Signal(envelope));
        if !delivered {
            debug!("{} from {} to departed {} dropped", kind, sender, to);
        }
        delivered
    }

    /// Routes one decoded client message.
    pub async fn handle_message(
        &self,
        connection_id: ConnectionId,
        msg: SignalMessage,
    ) -> Result<(), RegistryError> {
        match msg {
            SignalMessage::JoinRoom {
                room_id,
                user_id,
                user_name,
            } => {
                info!("{} ({}) wants to join room '{}'", connection_id, user_name, room_id);
                self.rooms
                    .join(connection_id, room_id, user_id, user_name)
                    .await?;
            }

            SignalMessage::LeaveRoom => {
                self.rooms.leave(connection_id).await?;
            }

            SignalMessage::Signal(envelope) => {
                self.relay(connection_id, envelope);
            }

            SignalMessage::SendMessage {
                message, user_name, ..
            } => {
                self.rooms.chat(connection_id, message, user_name).await?;
            }

            other => {
                warn!("Unexpected '{}' from client {}", other.op(), connection_id);
            }
        }
        Ok(())
    }
}
