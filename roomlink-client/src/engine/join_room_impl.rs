use crate::engine::MeshEngine;
use crate::media::{MediaMode, acquire_local_media};
use crate::{MeshError, MeshEvent};
use roomlink_core::{RoomId, SignalMessage};
use tracing::{info, warn};

impl MeshEngine {
    /// Acquires local media (degrading if it must) and asks to join.
    /// Joining while in a room leaves that room first.
    pub(super) async fn join_room(
        &mut self,
        room_id: RoomId,
        user_name: String,
    ) -> Result<(), MeshError> {
        if let Some(current) = &self.room {
            info!("Leaving '{}' before joining '{}'", current, room_id);
            self.leave_room()?;
        }

        self.media = acquire_local_media(self.devices.as_ref()).await;
        self.apply_enabled_flags();
        let mode = self.media.mode();
        if mode != MediaMode::Full {
            warn!("Joining '{}' with degraded media: {:?}", room_id, mode);
            self.emit(MeshEvent::MediaDegraded(mode));
        }

        info!("Joining '{}' as {}", room_id, user_name);
        self.user_name = user_name.clone();
        self.room = Some(room_id.clone());

        self.send_server(SignalMessage::JoinRoom {
            room_id,
            user_id: self.self_id.map(|id| id.to_string()).unwrap_or_default(),
            user_name,
        })?;
        self.pending_snapshots += 1;
        Ok(())
    }
}
