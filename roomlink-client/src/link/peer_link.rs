use crate::FailureReason;
use crate::link::{LinkCommand, LinkDeps, LinkParams, LinkReport, NegotiationState, Role};
use crate::transport::{LinkSetup, PeerTransport};
use roomlink_core::{ConnectionId, IceCandidate, SignalEnvelope, SignalMessage, SignalPayload};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Why a negotiation step did not complete.
#[derive(Debug)]
pub(super) enum Interrupted {
    Cancelled,
    TimedOut,
    Failed(anyhow::Error),
}

enum Wake {
    Cancelled,
    Expired,
    Command(Option<LinkCommand>),
}

/// State machine for one remote participant. Runs as its own task so a slow
/// peer never holds up the others.
pub(crate) struct PeerLink {
    pub(super) peer: ConnectionId,
    pub(super) serial: u64,
    pub(super) role: Role,
    pub(super) local_name: String,
    pub(super) state: NegotiationState,
    pub(super) pending_candidates: VecDeque<IceCandidate>,
    pub(super) remote_description_set: bool,
    /// Cleared once connected.
    deadline: Option<Instant>,
    state_tx: watch::Sender<NegotiationState>,
    commands: mpsc::UnboundedReceiver<LinkCommand>,
    cancel: CancellationToken,
    deps: LinkDeps,
}

impl PeerLink {
    pub(crate) fn new(
        params: LinkParams,
        deps: LinkDeps,
        commands: mpsc::UnboundedReceiver<LinkCommand>,
        state_tx: watch::Sender<NegotiationState>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            peer: params.peer,
            serial: params.serial,
            role: params.role,
            local_name: params.local_name,
            state: NegotiationState::Idle,
            pending_candidates: VecDeque::new(),
            remote_description_set: false,
            deadline: params.timeout.map(|t| Instant::now() + t),
            state_tx,
            commands,
            cancel,
            deps,
        }
    }

    pub(crate) async fn run(mut self, setup: LinkSetup) {
        debug!("Link to {} starting as {:?}", self.peer, self.role);

        let events = self.deps.transport_events.clone();
        let created = self.guard(self.deps.factory.create(setup, events)).await;
        let transport = match created {
            Ok(transport) => Some(transport),
            Err(i) => {
                self.interrupted(i);
                None
            }
        };

        if let Some(transport) = &transport {
            if let Err(i) = self.serve(transport.as_ref()).await {
                self.interrupted(i);
            }
        }

        self.shutdown(transport).await;
    }

    async fn serve(&mut self, transport: &dyn PeerTransport) -> Result<(), Interrupted> {
        if self.role == Role::Initiator {
            self.send_offer(transport).await?;
        }

        let cancel = self.cancel.clone();
        loop {
            let wake = tokio::select! {
                biased;
                _ = cancel.cancelled() => Wake::Cancelled,
                _ = expired(self.deadline) => Wake::Expired,
                cmd = self.commands.recv() => Wake::Command(cmd),
            };

            match wake {
                Wake::Cancelled => return Err(Interrupted::Cancelled),
                Wake::Expired => return Err(Interrupted::TimedOut),
                Wake::Command(None) => return Ok(()),
                Wake::Command(Some(cmd)) => self.handle(transport, cmd).await?,
            }
        }
    }

    async fn handle(
        &mut self,
        transport: &dyn PeerTransport,
        cmd: LinkCommand,
    ) -> Result<(), Interrupted> {
        match cmd {
            LinkCommand::RemoteOffer(offer) => self.accept_offer(transport, offer).await,
            LinkCommand::RemoteAnswer(answer) => self.accept_answer(transport, answer).await,
            LinkCommand::RemoteCandidate(candidate) => {
                self.accept_candidate(transport, candidate).await
            }
            LinkCommand::ReplaceVideo(track) => {
                let label = track.as_ref().map(|t| t.id().to_owned());
                match self.guard(transport.replace_video_track(track)).await {
                    Ok(()) => {
                        debug!("Video to {} now {:?}", self.peer, label);
                        Ok(())
                    }
                    Err(Interrupted::Failed(e)) => {
                        warn!("Could not replace video towards {}: {:#}", self.peer, e);
                        Ok(())
                    }
                    Err(i) => Err(i),
                }
            }
        }
    }

    /// Runs one transport step unless the link is cancelled or its
    /// negotiation window runs out first. A result that arrives after either
    /// is dropped.
    pub(super) async fn guard<T>(
        &self,
        step: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, Interrupted> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = expired(self.deadline) => Err(Interrupted::TimedOut),
            result = step => result.map_err(Interrupted::Failed),
        }
    }

    pub(super) fn set_state(&mut self, state: NegotiationState) {
        debug!("Link to {}: {:?} -> {:?}", self.peer, self.state, state);
        self.state = state;
        self.state_tx.send_replace(state);
    }

    pub(super) fn connected(&mut self) {
        self.set_state(NegotiationState::Connected);
        self.deadline = None;
        info!("Link to {} connected", self.peer);
        self.report(LinkReport::Connected {
            peer: self.peer,
            serial: self.serial,
        });
    }

    pub(super) fn signal(&self, payload: SignalPayload) {
        let envelope = SignalEnvelope::new(self.peer, payload);
        if self
            .deps
            .signals
            .send(SignalMessage::Signal(envelope))
            .is_err()
        {
            debug!("Signaling gone, {} not told", self.peer);
        }
    }

    fn report(&self, report: LinkReport) {
        let _ = self.deps.reports.send(report);
    }

    fn interrupted(&self, reason: Interrupted) {
        match reason {
            Interrupted::Cancelled => debug!("Link to {} cancelled in {:?}", self.peer, self.state),
            Interrupted::TimedOut => {
                warn!("Negotiation with {} timed out in {:?}", self.peer, self.state);
                self.report(LinkReport::Failed {
                    peer: self.peer,
                    serial: self.serial,
                    reason: FailureReason::NegotiationTimeout,
                });
            }
            Interrupted::Failed(e) => {
                error!("Link to {} failed in {:?}: {:#}", self.peer, self.state, e);
                self.report(LinkReport::Failed {
                    peer: self.peer,
                    serial: self.serial,
                    reason: FailureReason::Transport(format!("{e:#}")),
                });
            }
        }
    }

    async fn shutdown(&mut self, transport: Option<Arc<dyn PeerTransport>>) {
        if !self.pending_candidates.is_empty() {
            debug!(
                "Discarding {} queued candidates for {}",
                self.pending_candidates.len(),
                self.peer
            );
            self.pending_candidates.clear();
        }
        self.commands.close();

        if let Some(transport) = transport {
            if let Err(e) = transport.close().await {
                debug!("Closing transport to {}: {:#}", self.peer, e);
            }
        }

        self.set_state(NegotiationState::Closed);
        info!("Link to {} closed", self.peer);
    }
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
