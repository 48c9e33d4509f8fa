use crate::engine::MeshEngine;
use crate::link::LinkReport;
use crate::transport::TransportEvent;
use crate::{FailureReason, MeshEvent};
use roomlink_core::{ConnectionId, SignalEnvelope, SignalMessage, SignalPayload};
use tracing::{debug, warn};

impl MeshEngine {
    pub(super) fn handle_transport_event(&mut self, event: TransportEvent) {
        if !self.is_current(event.peer(), event.serial()) {
            debug!("Event from a retired link to {}, ignoring", event.peer());
            return;
        }

        match event {
            TransportEvent::CandidateGenerated {
                peer, candidate, ..
            } => {
                let envelope =
                    SignalEnvelope::new(peer, SignalPayload::IceCandidate { signal: candidate });
                if let Err(e) = self.send_server(SignalMessage::Signal(envelope)) {
                    debug!("Local candidate for {} not sent: {}", peer, e);
                }
            }

            TransportEvent::TrackAvailable { peer, track, .. } => {
                debug!("Remote {:?} track from {}", track.kind, peer);
                self.remote_tracks
                    .entry(peer)
                    .or_default()
                    .push(track.clone());
                self.emit(MeshEvent::RemoteTrackAvailable { id: peer, track });
            }

            TransportEvent::ConnectionFailed { peer, .. } => {
                self.fail_link(
                    peer,
                    FailureReason::Transport("peer connection failed".into()),
                );
            }
        }
    }

    pub(super) fn handle_link_report(&mut self, report: LinkReport) {
        match report {
            LinkReport::Connected { peer, serial } => {
                if self.is_current(peer, serial) {
                    self.emit(MeshEvent::PeerConnected { id: peer });
                }
            }
            LinkReport::Failed {
                peer,
                serial,
                reason,
            } => {
                if self.is_current(peer, serial) {
                    self.fail_link(peer, reason);
                }
            }
        }
    }

    fn fail_link(&mut self, peer: ConnectionId, reason: FailureReason) {
        if self.close_link(peer) {
            warn!("Link to {} failed: {}", peer, reason);
            self.emit(MeshEvent::PeerFailed { id: peer, reason });
        }
    }
}
