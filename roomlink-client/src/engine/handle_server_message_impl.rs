use crate::MeshEvent;
use crate::engine::MeshEngine;
use crate::link::Role;
use roomlink_core::{ConnectionId, MemberInfo, SignalMessage};
use tracing::{debug, info, warn};

impl MeshEngine {
    pub(super) fn handle_server_message(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Welcome { connection_id } => {
                info!("Signaling server knows us as {}", connection_id);
                self.self_id = Some(connection_id);
            }

            SignalMessage::IceConfig { ice_servers } => {
                if ice_servers.is_empty() {
                    debug!("Server advertised no ICE servers, keeping fallback");
                } else {
                    self.ice_servers = ice_servers;
                }
            }

            SignalMessage::ExistingUsers { users } => self.on_existing_users(users),

            SignalMessage::UserJoined {
                user_name,
                socket_id,
                ..
            } => self.on_user_joined(socket_id, user_name),

            SignalMessage::UserLeft { socket_id, .. } => self.on_user_left(socket_id),

            SignalMessage::Signal(envelope) => self.handle_signal(envelope),

            SignalMessage::ReceiveMessage {
                message,
                user_name,
                time,
            } => self.emit(MeshEvent::ChatMessage {
                user_name,
                message,
                time,
            }),

            other => warn!("Unexpected '{}' from signaling server", other.op()),
        }
    }

    /// We joined last, so we offer to everyone already there. Snapshots
    /// answering an earlier join describe a room we have since left.
    fn on_existing_users(&mut self, users: Vec<MemberInfo>) {
        self.pending_snapshots = self.pending_snapshots.saturating_sub(1);
        let room_id = match &self.room {
            Some(room_id) if self.pending_snapshots == 0 => room_id.clone(),
            _ => {
                debug!(
                    "Stale membership snapshot of {} members, ignoring",
                    users.len()
                );
                self.strangers.extend(users.iter().map(|u| u.socket_id));
                return;
            }
        };
        info!("Joined '{}' with {} members present", room_id, users.len());
        self.emit(MeshEvent::Joined {
            room_id,
            self_id: self.self_id,
        });

        for user in users {
            if Some(user.socket_id) == self.self_id {
                continue;
            }
            self.strangers.remove(&user.socket_id);
            self.open_link(user.socket_id, user.user_name, Role::Initiator);
        }
    }

    fn on_user_joined(&mut self, peer: ConnectionId, name: String) {
        if self.awaiting_snapshot() {
            debug!("user-joined for {} from a room we are not in, ignoring", peer);
            self.strangers.insert(peer);
            return;
        }
        self.strangers.remove(&peer);
        if self.links.contains_key(&peer) {
            debug!("Link to {} already opened by its offer", peer);
            return;
        }
        self.open_link(peer, name, Role::Responder);
    }

    fn on_user_left(&mut self, peer: ConnectionId) {
        if self.close_link(peer) {
            info!("Peer {} left", peer);
            self.emit(MeshEvent::PeerLeft { id: peer });
        } else {
            debug!("user-left for {} with no link", peer);
        }
    }
}
