use crate::engine::{EngineRequest, LinkSummary, MeshCommand, MeshEngine, MeshEvent};
use crate::media::{MediaDevices, VideoSource};
use crate::transport::WebRtcTransportFactory;
use crate::{ClientConfig, MeshError, NegotiationState, signaling};
use roomlink_core::{ConnectionId, RoomId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable handle onto a running [`MeshEngine`].
#[derive(Clone)]
pub struct MeshClient {
    request_tx: mpsc::UnboundedSender<EngineRequest>,
}

impl MeshClient {
    pub(crate) fn new(request_tx: mpsc::UnboundedSender<EngineRequest>) -> Self {
        Self { request_tx }
    }

    /// Dials the signaling server and starts an engine backed by `webrtc`.
    pub async fn connect(
        config: ClientConfig,
        devices: Arc<dyn MediaDevices>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<MeshEvent>), MeshError> {
        let channel = signaling::connect(&config.signaling_url).await?;
        let factory =
            WebRtcTransportFactory::new().map_err(|e| MeshError::TransportSetup(format!("{e:#}")))?;
        Ok(MeshEngine::start(config, channel, Arc::new(factory), devices))
    }

    /// Runs `command` and waits until the engine has acted on it.
    pub async fn execute(&self, command: MeshCommand) -> Result<(), MeshError> {
        let (reply, rx) = oneshot::channel();
        self.request_tx
            .send(EngineRequest::Command { command, reply })
            .map_err(|_| MeshError::EngineStopped)?;
        rx.await.map_err(|_| MeshError::EngineStopped)?
    }

    pub async fn join(&self, room_id: RoomId, user_name: impl Into<String>) -> Result<(), MeshError> {
        self.execute(MeshCommand::Join {
            room_id,
            user_name: user_name.into(),
        })
        .await
    }

    pub async fn leave(&self) -> Result<(), MeshError> {
        self.execute(MeshCommand::Leave).await
    }

    pub async fn substitute_video(&self, source: VideoSource) -> Result<(), MeshError> {
        self.execute(MeshCommand::SubstituteVideo(source)).await
    }

    pub async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), MeshError> {
        self.execute(MeshCommand::SetMicrophoneEnabled(enabled)).await
    }

    pub async fn set_camera_enabled(&self, enabled: bool) -> Result<(), MeshError> {
        self.execute(MeshCommand::SetCameraEnabled(enabled)).await
    }

    pub async fn send_chat(&self, message: impl Into<String>) -> Result<(), MeshError> {
        self.execute(MeshCommand::SendChat(message.into())).await
    }

    pub async fn peer_links(&self) -> Result<Vec<LinkSummary>, MeshError> {
        let (reply, rx) = oneshot::channel();
        self.request_tx
            .send(EngineRequest::PeerLinks { reply })
            .map_err(|_| MeshError::EngineStopped)?;
        rx.await.map_err(|_| MeshError::EngineStopped)
    }

    /// Live view of the negotiation state of the link to `peer`, if any.
    pub async fn watch_link(
        &self,
        peer: ConnectionId,
    ) -> Result<Option<watch::Receiver<NegotiationState>>, MeshError> {
        let (reply, rx) = oneshot::channel();
        self.request_tx
            .send(EngineRequest::WatchLink { peer, reply })
            .map_err(|_| MeshError::EngineStopped)?;
        rx.await.map_err(|_| MeshError::EngineStopped)
    }
}
