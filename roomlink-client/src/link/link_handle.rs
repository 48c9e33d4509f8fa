use crate::link::peer_link::PeerLink;
use crate::link::{LinkCommand, LinkReport, NegotiationState, Role};
use crate::media::OutgoingTracks;
use crate::transport::{LinkSetup, TransportEvent, TransportFactory};
use roomlink_core::{ConnectionId, IceServerConfig, SignalMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone)]
pub(crate) struct LinkParams {
    pub peer: ConnectionId,
    pub serial: u64,
    pub role: Role,
    /// Our display name, carried on offers.
    pub local_name: String,
    pub ice_servers: Vec<IceServerConfig>,
    pub outgoing: OutgoingTracks,
    pub timeout: Option<Duration>,
}

/// Channels and factories shared by every link of one engine.
#[derive(Clone)]
pub(crate) struct LinkDeps {
    pub factory: Arc<dyn TransportFactory>,
    pub transport_events: mpsc::UnboundedSender<TransportEvent>,
    pub signals: mpsc::UnboundedSender<SignalMessage>,
    pub reports: mpsc::UnboundedSender<LinkReport>,
}

/// Owner's side of a running peer link.
pub struct LinkHandle {
    peer: ConnectionId,
    serial: u64,
    role: Role,
    command_tx: mpsc::UnboundedSender<LinkCommand>,
    cancel: CancellationToken,
    state_rx: watch::Receiver<NegotiationState>,
}

impl LinkHandle {
    pub(crate) fn spawn(params: LinkParams, deps: LinkDeps) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(NegotiationState::Idle);
        let cancel = CancellationToken::new();

        let setup = LinkSetup {
            peer: params.peer,
            serial: params.serial,
            ice_servers: params.ice_servers.clone(),
            outgoing: params.outgoing.clone(),
        };
        let (peer, serial, role) = (params.peer, params.serial, params.role);

        let link = PeerLink::new(params, deps, command_rx, state_tx, cancel.clone());
        tokio::spawn(link.run(setup));

        Self {
            peer,
            serial,
            role,
            command_tx,
            cancel,
            state_rx,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Queues `command` behind whatever the link is doing. `false` once the
    /// link has shut down; the command is discarded.
    pub fn send(&self, command: LinkCommand) -> bool {
        match self.command_tx.send(command) {
            Ok(()) => true,
            Err(e) => {
                debug!("Link to {} already gone, dropping {:?}", self.peer, e.0);
                false
            }
        }
    }

    pub fn state(&self) -> NegotiationState {
        *self.state_rx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<NegotiationState> {
        self.state_rx.clone()
    }

    /// Cancels any step in flight and releases the transport. Idempotent.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}
