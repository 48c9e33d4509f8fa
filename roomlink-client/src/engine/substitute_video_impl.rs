use crate::MeshEvent;
use crate::engine::MeshEngine;
use crate::link::LinkCommand;
use crate::media::{OutgoingTracks, VideoSource};
use tracing::{debug, info};

impl MeshEngine {
    /// Swaps the outgoing video on every known link, connected or still
    /// negotiating. Each link applies it on its own; one that is gone or
    /// rejects the swap does not affect the rest.
    pub(super) fn substitute_video(&mut self, source: VideoSource) {
        let kind = source.kind();
        let track = match source {
            VideoSource::Camera => {
                self.stop_screen();
                let camera = self.media.live_camera();
                if camera.is_none() {
                    info!("Camera no longer available, sending no video");
                }
                camera
            }
            VideoSource::Screen(screen) => {
                if let Some(previous) = self.screen.replace(screen.clone()) {
                    if previous != screen {
                        previous.stop();
                    }
                }
                Some(screen)
            }
        };

        let mut applied = 0;
        for (peer, entry) in &self.links {
            if entry.handle.send(LinkCommand::ReplaceVideo(track.clone())) {
                applied += 1;
            } else {
                debug!("Link to {} gone, skipped substitution", peer);
            }
        }
        info!("Outgoing video is now {:?} on {} links", kind, applied);

        self.emit(MeshEvent::LocalTrackSubstituted(kind));
    }

    pub(super) fn stop_screen(&mut self) {
        if let Some(screen) = self.screen.take() {
            screen.stop();
        }
    }

    /// What a link opened right now should send.
    pub(super) fn outgoing_tracks(&self) -> OutgoingTracks {
        OutgoingTracks {
            audio: self.media.microphone.clone(),
            video: self.screen.clone().or_else(|| self.media.live_camera()),
        }
    }
}
