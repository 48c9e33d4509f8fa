use crate::room::registry_actor::RegistryActor;
use crate::room::{RegistryError, RoomCommand};
use crate::signaling::SignalingOutput;
use roomlink_core::{ConnectionId, MemberInfo, RoomId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::error;

const COMMAND_BUFFER: usize = 256;

/// Cloneable handle onto the room registry actor.
#[derive(Clone)]
pub struct RoomManager {
    command_tx: mpsc::Sender<RoomCommand>,
}

impl RoomManager {
    /// Spawns the registry actor on the current runtime.
    pub fn spawn(output: Arc<dyn SignalingOutput>) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let actor = RegistryActor::new(command_rx, output);
        tokio::spawn(actor.run());

        Self { command_tx }
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RegistryError> {
        self.command_tx.send(cmd).await.map_err(|e| {
            error!("Room registry died: {}", e);
            RegistryError::Unavailable
        })
    }

    pub async fn connect(&self, connection_id: ConnectionId) -> Result<(), RegistryError> {
        self.send(RoomCommand::Connect { connection_id }).await
    }

    pub async fn join(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: String,
        user_name: String,
    ) -> Result<Vec<MemberInfo>, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            connection_id,
            room_id,
            user_id,
            user_name,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RegistryError::Unavailable)?
    }

    pub async fn leave(&self, connection_id: ConnectionId) -> Result<(), RegistryError> {
        self.send(RoomCommand::Leave { connection_id }).await
    }

    /// Returns `true` only for the call that actually destroyed the session.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Result<bool, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Disconnect {
            connection_id,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| RegistryError::Unavailable)
    }

    pub async fn chat(
        &self,
        connection_id: ConnectionId,
        message: String,
        user_name: String,
    ) -> Result<(), RegistryError> {
        self.send(RoomCommand::Chat {
            connection_id,
            message,
            user_name,
        })
        .await
    }

    pub async fn members(&self, room_id: RoomId) -> Result<Vec<MemberInfo>, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Members { room_id, reply }).await?;
        rx.await.map_err(|_| RegistryError::Unavailable)
    }
}
