mod transport_event;
mod webrtc_transport;

pub use transport_event::TransportEvent;
pub use webrtc_transport::{WebRtcTransport, WebRtcTransportFactory};

use crate::media::{LocalTrack, OutgoingTracks};
use anyhow::Result;
use async_trait::async_trait;
use roomlink_core::{ConnectionId, IceCandidate, IceServerConfig, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything a transport needs to know about the link it backs.
#[derive(Debug, Clone)]
pub struct LinkSetup {
    pub peer: ConnectionId,
    /// Distinguishes successive links to the same peer.
    pub serial: u64,
    pub ice_servers: Vec<IceServerConfig>,
    pub outgoing: OutgoingTracks,
}

/// One direct media session with a remote participant.
///
/// Calls for a given link are strictly sequential; implementations do not
/// need to guard against concurrent use.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Swaps what the outgoing video channel carries, without renegotiation.
    async fn replace_video_track(&self, track: Option<LocalTrack>) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait TransportFactory: Send + Sync {
    /// Builds the transport for one link. Asynchronous happenings are pushed
    /// into `events`, tagged with the link's peer and serial.
    async fn create(
        &self,
        setup: LinkSetup,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>>;
}
