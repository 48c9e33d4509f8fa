mod config;
mod engine;
mod error;
mod link;
pub mod media;
pub mod signaling;
pub mod transport;

pub use config::{ClientConfig, DEFAULT_NEGOTIATION_TIMEOUT, DEFAULT_SIGNALING_URL};
pub use engine::{LinkSummary, MeshClient, MeshCommand, MeshEngine, MeshEvent};
pub use error::{FailureReason, MediaError, MeshError};
pub use link::{NegotiationState, Role};
pub use media::{
    LocalMedia, LocalTrack, MediaMode, RemoteTrack, TrackKind, TrackSource, VideoSource,
    VideoSourceKind,
};
