use crate::MediaError;
use crate::media::{LocalTrack, TrackSource};
use async_trait::async_trait;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

/// Capture back-end the engine asks for local media.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn user_media(&self, constraints: MediaConstraints) -> Result<Vec<LocalTrack>, MediaError>;
}

/// How much local media the participant ended up sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    Full,
    AudioOnly,
    VideoOnly,
    ReceiveOnly,
}

#[derive(Debug, Clone, Default)]
pub struct LocalMedia {
    pub microphone: Option<LocalTrack>,
    pub camera: Option<LocalTrack>,
}

impl LocalMedia {
    pub fn none() -> Self {
        Self::default()
    }

    fn from_tracks(tracks: Vec<LocalTrack>) -> Self {
        let mut media = Self::none();
        for track in tracks {
            match track.source() {
                TrackSource::Microphone if media.microphone.is_none() => media.microphone = Some(track),
                TrackSource::Camera if media.camera.is_none() => media.camera = Some(track),
                _ => {}
            }
        }
        media
    }

    pub fn mode(&self) -> MediaMode {
        match (&self.microphone, &self.camera) {
            (Some(_), Some(_)) => MediaMode::Full,
            (Some(_), None) => MediaMode::AudioOnly,
            (None, Some(_)) => MediaMode::VideoOnly,
            (None, None) => MediaMode::ReceiveOnly,
        }
    }

    /// Live camera, or `None` once it was stopped.
    pub fn live_camera(&self) -> Option<LocalTrack> {
        self.camera.clone().filter(|c| !c.is_ended())
    }

    pub fn stop(&self) {
        if let Some(track) = &self.microphone {
            track.stop();
        }
        if let Some(track) = &self.camera {
            track.stop();
        }
    }
}

/// Camera + microphone, falling back to microphone only, then to nothing.
/// Never fails: a participant without devices can still receive.
pub async fn acquire_local_media(devices: &dyn MediaDevices) -> LocalMedia {
    let full = MediaConstraints {
        audio: true,
        video: true,
    };
    match devices.user_media(full).await {
        Ok(tracks) => return LocalMedia::from_tracks(tracks),
        Err(e) => warn!("Could not access camera/microphone: {}", e),
    }

    let audio_only = MediaConstraints {
        audio: true,
        video: false,
    };
    match devices.user_media(audio_only).await {
        Ok(tracks) => return LocalMedia::from_tracks(tracks),
        Err(e) => warn!("Audio capture failed too: {}", e),
    }

    info!("Joining as listener only");
    LocalMedia::none()
}

/// Devices that hand out fresh, unfed tracks. The caller writes samples.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDevices {
    pub audio: bool,
    pub video: bool,
}

#[async_trait]
impl MediaDevices for SyntheticDevices {
    async fn user_media(&self, constraints: MediaConstraints) -> Result<Vec<LocalTrack>, MediaError> {
        if constraints.video && !self.video {
            return Err(MediaError::Unavailable("video".into()));
        }
        if constraints.audio && !self.audio {
            return Err(MediaError::Unavailable("audio".into()));
        }

        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(LocalTrack::new(TrackSource::Microphone));
        }
        if constraints.video {
            tracks.push(LocalTrack::new(TrackSource::Camera));
        }
        Ok(tracks)
    }
}
