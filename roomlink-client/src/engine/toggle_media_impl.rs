use crate::MeshEvent;
use crate::engine::MeshEngine;
use crate::media::TrackSource;
use tracing::{debug, info};

impl MeshEngine {
    /// Enables or disables the shared microphone or camera track. Every link
    /// sends the same track, so one flip reaches all peers. The choice is
    /// remembered and applied to media acquired on later joins.
    pub(super) fn set_source_enabled(&mut self, source: TrackSource, enabled: bool) {
        let track = match source {
            TrackSource::Microphone => {
                self.microphone_enabled = enabled;
                self.media.microphone.as_ref()
            }
            TrackSource::Camera => {
                self.camera_enabled = enabled;
                self.media.camera.as_ref()
            }
            TrackSource::Screen => {
                debug!("Screen share is stopped, not disabled; ignoring");
                return;
            }
        };

        match track {
            Some(track) => {
                track.set_enabled(enabled);
                info!("{:?} {}", source, if enabled { "enabled" } else { "disabled" });
            }
            None => debug!("No {:?} track yet, remembering the choice", source),
        }
        self.emit(MeshEvent::LocalTrackEnabled { source, enabled });
    }

    pub(super) fn apply_enabled_flags(&self) {
        if let Some(mic) = &self.media.microphone {
            mic.set_enabled(self.microphone_enabled);
        }
        if let Some(camera) = &self.media.camera {
            camera.set_enabled(self.camera_enabled);
        }
    }
}
