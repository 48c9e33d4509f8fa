use crate::engine::MeshEngine;
use crate::media::LocalMedia;
use crate::{MeshError, MeshEvent};
use roomlink_core::SignalMessage;
use tracing::{debug, info};

impl MeshEngine {
    /// Closes every link, releases local media and tells the server.
    /// A no-op outside a room.
    pub(super) fn leave_room(&mut self) -> Result<(), MeshError> {
        let Some(room_id) = self.room.take() else {
            debug!("Leave requested outside a room");
            return Ok(());
        };
        info!("Leaving '{}'", room_id);

        let peers: Vec<_> = self.links.keys().copied().collect();
        for peer in peers {
            self.strangers.insert(peer);
            if self.close_link(peer) {
                self.emit(MeshEvent::PeerLeft { id: peer });
            }
        }

        self.stop_screen();
        self.media.stop();
        self.media = LocalMedia::none();

        self.send_server(SignalMessage::LeaveRoom)
    }
}
