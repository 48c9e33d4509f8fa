mod devices;
mod local_track;
mod remote_track;

pub use devices::*;
pub use local_track::*;
pub use remote_track::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    Microphone,
    Camera,
    Screen,
}

impl TrackSource {
    pub fn kind(self) -> TrackKind {
        match self {
            TrackSource::Microphone => TrackKind::Audio,
            TrackSource::Camera | TrackSource::Screen => TrackKind::Video,
        }
    }
}

/// What to send on the outgoing video channel.
#[derive(Debug, Clone)]
pub enum VideoSource {
    Camera,
    Screen(LocalTrack),
}

impl VideoSource {
    pub fn kind(&self) -> VideoSourceKind {
        match self {
            VideoSource::Camera => VideoSourceKind::Camera,
            VideoSource::Screen(_) => VideoSourceKind::Screen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSourceKind {
    Camera,
    Screen,
}
