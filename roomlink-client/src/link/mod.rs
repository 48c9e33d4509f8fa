mod link_handle;
mod negotiation_impl;
mod peer_link;

pub use link_handle::LinkHandle;
pub(crate) use link_handle::{LinkDeps, LinkParams};

use crate::FailureReason;
use crate::media::LocalTrack;
use roomlink_core::{ConnectionId, IceCandidate, SessionDescription};

/// Which side of the offer/answer exchange this link plays. The participant
/// that joined later always initiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    LocalOfferPending,
    RemoteAnswerPending,
    RemoteOfferReceived,
    LocalAnswerSent,
    Connected,
    Closed,
}

impl NegotiationState {
    pub fn is_pending(self) -> bool {
        !matches!(self, NegotiationState::Connected | NegotiationState::Closed)
    }
}

/// Inputs a link processes strictly one at a time, in arrival order.
#[derive(Debug)]
pub enum LinkCommand {
    RemoteOffer(SessionDescription),
    RemoteAnswer(SessionDescription),
    RemoteCandidate(IceCandidate),
    ReplaceVideo(Option<LocalTrack>),
}

/// What a link tells its coordinator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LinkReport {
    Connected {
        peer: ConnectionId,
        serial: u64,
    },
    Failed {
        peer: ConnectionId,
        serial: u64,
        reason: FailureReason,
    },
}
