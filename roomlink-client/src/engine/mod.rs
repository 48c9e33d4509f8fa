use crate::ClientConfig;
use crate::FailureReason;
use crate::MeshError;
use crate::link::{LinkDeps, LinkHandle, LinkParams, LinkReport, NegotiationState, Role};
use crate::media::{
    LocalMedia, LocalTrack, MediaDevices, MediaMode, RemoteTrack, TrackSource, VideoSource,
    VideoSourceKind,
};
use crate::signaling::SignalingChannel;
use crate::transport::{TransportEvent, TransportFactory};
use roomlink_core::{ConnectionId, IceServerConfig, RoomId, SignalMessage};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

mod handle_link_events_impl;
mod handle_server_message_impl;
mod handle_signal_impl;
mod join_room_impl;
mod leave_room_impl;
mod mesh_client;
mod substitute_video_impl;
mod toggle_media_impl;

pub use mesh_client::MeshClient;

/// Requests from the presentation layer.
#[derive(Debug, Clone)]
pub enum MeshCommand {
    Join { room_id: RoomId, user_name: String },
    Leave,
    SubstituteVideo(VideoSource),
    /// Mute or unmute the microphone for every peer.
    SetMicrophoneEnabled(bool),
    /// Turn the camera picture off or back on for every peer.
    SetCameraEnabled(bool),
    SendChat(String),
}

/// What the mesh reports upward.
#[derive(Debug, Clone)]
pub enum MeshEvent {
    Joined {
        room_id: RoomId,
        self_id: Option<ConnectionId>,
    },
    PeerJoined {
        id: ConnectionId,
        name: String,
    },
    PeerLeft {
        id: ConnectionId,
    },
    PeerConnected {
        id: ConnectionId,
    },
    PeerFailed {
        id: ConnectionId,
        reason: FailureReason,
    },
    RemoteTrackAvailable {
        id: ConnectionId,
        track: RemoteTrack,
    },
    LocalTrackSubstituted(VideoSourceKind),
    LocalTrackEnabled {
        source: TrackSource,
        enabled: bool,
    },
    MediaDegraded(MediaMode),
    ChatMessage {
        user_name: String,
        message: String,
        time: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    pub peer: ConnectionId,
    pub name: String,
    pub role: Role,
    pub state: NegotiationState,
    pub remote_tracks: usize,
}

pub(crate) enum EngineRequest {
    Command {
        command: MeshCommand,
        reply: oneshot::Sender<Result<(), MeshError>>,
    },
    PeerLinks {
        reply: oneshot::Sender<Vec<LinkSummary>>,
    },
    WatchLink {
        peer: ConnectionId,
        reply: oneshot::Sender<Option<watch::Receiver<NegotiationState>>>,
    },
}

struct LinkEntry {
    handle: LinkHandle,
    name: String,
}

/// Mesh coordinator: one per local participant. Owns every peer link, the
/// local media and the room association.
pub struct MeshEngine {
    config: ClientConfig,
    self_id: Option<ConnectionId>,
    room: Option<RoomId>,
    user_name: String,
    ice_servers: Vec<IceServerConfig>,
    links: HashMap<ConnectionId, LinkEntry>,
    /// `join-room` requests whose `existing-users` reply is still in flight.
    /// Only the reply to the latest one describes the current room.
    pending_snapshots: usize,
    /// Peers seen outside the current room. They get no link until a
    /// `user-joined` puts them in it.
    strangers: HashSet<ConnectionId>,
    remote_tracks: HashMap<ConnectionId, Vec<RemoteTrack>>,
    media: LocalMedia,
    microphone_enabled: bool,
    camera_enabled: bool,
    screen: Option<LocalTrack>,
    next_serial: u64,
    devices: Arc<dyn MediaDevices>,
    deps: LinkDeps,
    events: mpsc::UnboundedSender<MeshEvent>,
}

impl MeshEngine {
    /// Spawns the engine over an established signaling channel.
    pub fn start(
        config: ClientConfig,
        channel: SignalingChannel,
        factory: Arc<dyn TransportFactory>,
        devices: Arc<dyn MediaDevices>,
    ) -> (MeshClient, mpsc::UnboundedReceiver<MeshEvent>) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        let (report_tx, report_rx) = mpsc::unbounded_channel();

        let SignalingChannel { outbound, inbound } = channel;

        let engine = Self {
            ice_servers: config.fallback_ice_servers.clone(),
            config,
            self_id: None,
            room: None,
            user_name: String::new(),
            links: HashMap::new(),
            pending_snapshots: 0,
            strangers: HashSet::new(),
            remote_tracks: HashMap::new(),
            media: LocalMedia::none(),
            microphone_enabled: true,
            camera_enabled: true,
            screen: None,
            next_serial: 0,
            devices,
            deps: LinkDeps {
                factory,
                transport_events: transport_tx,
                signals: outbound,
                reports: report_tx,
            },
            events: event_tx,
        };
        tokio::spawn(engine.run(request_rx, inbound, transport_rx, report_rx));

        (MeshClient::new(request_tx), event_rx)
    }

    async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<EngineRequest>,
        mut inbound: mpsc::UnboundedReceiver<SignalMessage>,
        mut transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
        mut report_rx: mpsc::UnboundedReceiver<LinkReport>,
    ) {
        info!("Mesh engine started");

        loop {
            tokio::select! {
                req = requests.recv() => match req {
                    Some(r) => self.handle_request(r).await,
                    None => {
                        info!("Every client handle dropped, stopping mesh engine");
                        break;
                    }
                },

                msg = inbound.recv() => match msg {
                    Some(m) => self.handle_server_message(m),
                    None => {
                        warn!("Signaling channel closed, stopping mesh engine");
                        break;
                    }
                },

                Some(event) = transport_rx.recv() => self.handle_transport_event(event),

                Some(report) = report_rx.recv() => self.handle_link_report(report),
            }
        }

        if let Err(e) = self.leave_room() {
            debug!("Final leave not delivered: {}", e);
        }
        self.stop_screen();
        info!("Mesh engine finished");
    }

    async fn handle_request(&mut self, request: EngineRequest) {
        match request {
            EngineRequest::Command { command, reply } => {
                let result = self.handle_command(command).await;
                let _ = reply.send(result);
            }
            EngineRequest::PeerLinks { reply } => {
                let _ = reply.send(self.link_summaries());
            }
            EngineRequest::WatchLink { peer, reply } => {
                let _ = reply.send(self.links.get(&peer).map(|e| e.handle.watch_state()));
            }
        }
    }

    async fn handle_command(&mut self, command: MeshCommand) -> Result<(), MeshError> {
        match command {
            MeshCommand::Join { room_id, user_name } => self.join_room(room_id, user_name).await,
            MeshCommand::Leave => self.leave_room(),
            MeshCommand::SubstituteVideo(source) => {
                self.substitute_video(source);
                Ok(())
            }
            MeshCommand::SetMicrophoneEnabled(enabled) => {
                self.set_source_enabled(TrackSource::Microphone, enabled);
                Ok(())
            }
            MeshCommand::SetCameraEnabled(enabled) => {
                self.set_source_enabled(TrackSource::Camera, enabled);
                Ok(())
            }
            MeshCommand::SendChat(message) => self.send_chat(message),
        }
    }

    fn send_chat(&self, message: String) -> Result<(), MeshError> {
        let room_id = self.room.as_ref().ok_or(MeshError::NotJoined)?;
        self.send_server(SignalMessage::SendMessage {
            room_id: Some(room_id.to_string()),
            message,
            user_name: self.user_name.clone(),
        })
    }

    fn link_summaries(&self) -> Vec<LinkSummary> {
        let mut summaries: Vec<_> = self
            .links
            .iter()
            .map(|(peer, entry)| LinkSummary {
                peer: *peer,
                name: entry.name.clone(),
                role: entry.handle.role(),
                state: entry.handle.state(),
                remote_tracks: self.remote_tracks.get(peer).map_or(0, Vec::len),
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.peer.cmp(&b.peer)));
        summaries
    }

    /// Starts a link to `peer`, replacing any previous one.
    fn open_link(&mut self, peer: ConnectionId, name: String, role: Role) {
        if let Some(old) = self.links.remove(&peer) {
            debug!("Replacing existing link to {}", peer);
            old.handle.close();
            self.remote_tracks.remove(&peer);
        }

        self.next_serial += 1;
        let params = LinkParams {
            peer,
            serial: self.next_serial,
            role,
            local_name: self.user_name.clone(),
            ice_servers: self.ice_servers.clone(),
            outgoing: self.outgoing_tracks(),
            timeout: self.config.negotiation_timeout,
        };
        let handle = LinkHandle::spawn(params, self.deps.clone());
        info!("Opened link to {} ({}) as {:?}", peer, name, role);

        self.links.insert(
            peer,
            LinkEntry {
                handle,
                name: name.clone(),
            },
        );
        self.emit(MeshEvent::PeerJoined { id: peer, name });
    }

    /// Closes and forgets the link to `peer` along with its remote media.
    fn close_link(&mut self, peer: ConnectionId) -> bool {
        self.remote_tracks.remove(&peer);
        match self.links.remove(&peer) {
            Some(entry) => {
                entry.handle.close();
                true
            }
            None => false,
        }
    }

    /// True until the snapshot of the latest join has been applied.
    fn awaiting_snapshot(&self) -> bool {
        self.room.is_none() || self.pending_snapshots > 0
    }

    fn is_current(&self, peer: ConnectionId, serial: u64) -> bool {
        self.links
            .get(&peer)
            .is_some_and(|e| e.handle.serial() == serial)
    }

    fn emit(&self, event: MeshEvent) {
        if self.events.send(event).is_err() {
            debug!("No one is listening for mesh events");
        }
    }

    fn send_server(&self, msg: SignalMessage) -> Result<(), MeshError> {
        self.deps
            .signals
            .send(msg)
            .map_err(|_| MeshError::SignalingClosed)
    }
}
