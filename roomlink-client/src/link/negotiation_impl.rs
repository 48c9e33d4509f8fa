use crate::link::peer_link::{Interrupted, PeerLink};
use crate::link::{NegotiationState, Role};
use crate::transport::PeerTransport;
use roomlink_core::{IceCandidate, SessionDescription, SignalPayload};
use tracing::{debug, warn};

impl PeerLink {
    /// The offer is committed locally before it goes on the wire.
    pub(super) async fn send_offer(
        &mut self,
        transport: &dyn PeerTransport,
    ) -> Result<(), Interrupted> {
        self.set_state(NegotiationState::LocalOfferPending);
        let offer = self.guard(transport.create_offer()).await?;
        self.guard(transport.set_local_description(offer.clone()))
            .await?;

        self.signal(SignalPayload::Offer {
            signal: offer,
            user_name: self.local_name.clone(),
        });
        self.set_state(NegotiationState::RemoteAnswerPending);
        Ok(())
    }

    pub(super) async fn accept_offer(
        &mut self,
        transport: &dyn PeerTransport,
        offer: SessionDescription,
    ) -> Result<(), Interrupted> {
        if self.role != Role::Responder || self.state != NegotiationState::Idle {
            warn!(
                "Offer from {} while {:?} as {:?}, discarding",
                self.peer, self.state, self.role
            );
            return Ok(());
        }

        self.guard(transport.set_remote_description(offer)).await?;
        self.remote_description_set = true;
        self.set_state(NegotiationState::RemoteOfferReceived);
        self.flush_candidates(transport).await?;

        let answer = self.guard(transport.create_answer()).await?;
        self.guard(transport.set_local_description(answer.clone()))
            .await?;
        self.signal(SignalPayload::Answer { signal: answer });
        self.set_state(NegotiationState::LocalAnswerSent);

        self.connected();
        Ok(())
    }

    pub(super) async fn accept_answer(
        &mut self,
        transport: &dyn PeerTransport,
        answer: SessionDescription,
    ) -> Result<(), Interrupted> {
        if !matches!(
            self.state,
            NegotiationState::LocalOfferPending | NegotiationState::RemoteAnswerPending
        ) {
            warn!(
                "Answer from {} while {:?}, no offer outstanding; discarding",
                self.peer, self.state
            );
            return Ok(());
        }

        self.guard(transport.set_remote_description(answer)).await?;
        self.remote_description_set = true;
        self.flush_candidates(transport).await?;

        self.connected();
        Ok(())
    }

    /// Candidates that beat the remote description wait for it.
    pub(super) async fn accept_candidate(
        &mut self,
        transport: &dyn PeerTransport,
        candidate: IceCandidate,
    ) -> Result<(), Interrupted> {
        if !self.remote_description_set {
            self.pending_candidates.push_back(candidate);
            debug!(
                "Queued candidate from {} ({} waiting)",
                self.peer,
                self.pending_candidates.len()
            );
            return Ok(());
        }
        self.apply_candidate(transport, candidate).await
    }

    async fn flush_candidates(&mut self, transport: &dyn PeerTransport) -> Result<(), Interrupted> {
        if !self.pending_candidates.is_empty() {
            debug!(
                "Applying {} queued candidates from {}",
                self.pending_candidates.len(),
                self.peer
            );
        }
        while let Some(candidate) = self.pending_candidates.pop_front() {
            self.apply_candidate(transport, candidate).await?;
        }
        Ok(())
    }

    /// A candidate the transport rejects costs only that candidate.
    async fn apply_candidate(
        &self,
        transport: &dyn PeerTransport,
        candidate: IceCandidate,
    ) -> Result<(), Interrupted> {
        match self.guard(transport.add_ice_candidate(candidate)).await {
            Err(Interrupted::Failed(e)) => {
                warn!("Candidate from {} rejected: {:#}", self.peer, e);
                Ok(())
            }
            other => other,
        }
    }
}
