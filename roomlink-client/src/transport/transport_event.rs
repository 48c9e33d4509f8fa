use crate::media::RemoteTrack;
use roomlink_core::{ConnectionId, IceCandidate};

#[derive(Debug, Clone)]
pub enum TransportEvent {
    CandidateGenerated {
        peer: ConnectionId,
        serial: u64,
        candidate: IceCandidate,
    },
    TrackAvailable {
        peer: ConnectionId,
        serial: u64,
        track: RemoteTrack,
    },
    ConnectionFailed {
        peer: ConnectionId,
        serial: u64,
    },
}

impl TransportEvent {
    pub fn peer(&self) -> ConnectionId {
        match self {
            TransportEvent::CandidateGenerated { peer, .. }
            | TransportEvent::TrackAvailable { peer, .. }
            | TransportEvent::ConnectionFailed { peer, .. } => *peer,
        }
    }

    pub fn serial(&self) -> u64 {
        match self {
            TransportEvent::CandidateGenerated { serial, .. }
            | TransportEvent::TrackAvailable { serial, .. }
            | TransportEvent::ConnectionFailed { serial, .. } => *serial,
        }
    }
}
