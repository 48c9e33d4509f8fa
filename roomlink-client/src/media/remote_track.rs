use crate::media::TrackKind;
use std::sync::Arc;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_remote::TrackRemote;

/// Handle on media arriving from a remote participant.
#[derive(Clone, Debug)]
pub struct RemoteTrack {
    pub track_id: String,
    pub stream_id: String,
    pub kind: TrackKind,
    inner: Option<Arc<TrackRemote>>,
}

impl RemoteTrack {
    pub fn from_webrtc(track: Arc<TrackRemote>) -> Self {
        let kind = match track.kind() {
            RTPCodecType::Audio => TrackKind::Audio,
            _ => TrackKind::Video,
        };
        Self {
            track_id: track.id().to_string(),
            stream_id: track.stream_id().to_string(),
            kind,
            inner: Some(track),
        }
    }

    /// A handle with no RTP source behind it, for transports that are not
    /// backed by `webrtc`.
    pub fn detached(track_id: impl Into<String>, stream_id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            track_id: track_id.into(),
            stream_id: stream_id.into(),
            kind,
            inner: None,
        }
    }

    /// The RTP reader, when the transport is `webrtc`.
    pub fn rtp_track(&self) -> Option<&Arc<TrackRemote>> {
        self.inner.as_ref()
    }
}
