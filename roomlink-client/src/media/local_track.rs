use crate::media::{TrackKind, TrackSource};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::error::Error as RtcError;
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

const LOCAL_STREAM_ID: &str = "roomlink-local";

/// A captured local source. Clones share the same underlying track, so one
/// capture fans out read-only to every peer link. Disabling or stopping it
/// is likewise seen by every clone.
#[derive(Clone)]
pub struct LocalTrack {
    id: String,
    source: TrackSource,
    rtp: Arc<TrackLocalStaticSample>,
    enabled: Arc<AtomicBool>,
    ended: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(source: TrackSource) -> Self {
        let id = Uuid::new_v4().to_string();
        let codec = match source.kind() {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        };
        let rtp = Arc::new(TrackLocalStaticSample::new(
            codec,
            id.clone(),
            LOCAL_STREAM_ID.to_owned(),
        ));

        Self {
            id,
            source,
            rtp,
            enabled: Arc::new(AtomicBool::new(true)),
            ended: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> TrackSource {
        self.source
    }

    pub fn kind(&self) -> TrackKind {
        self.source.kind()
    }

    /// Sample writer for whoever feeds captured media into this track.
    pub fn sample_track(&self) -> Arc<TrackLocalStaticSample> {
        self.rtp.clone()
    }

    pub(crate) fn as_track_local(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        self.rtp.clone()
    }

    /// Feeds one captured sample to every peer sending this track. While the
    /// track is disabled or ended the sample is dropped and peers get nothing.
    pub async fn write_sample(&self, sample: &Sample) -> Result<(), RtcError> {
        if !self.is_enabled() || self.is_ended() {
            return Ok(());
        }
        self.rtp.write_sample(sample).await
    }

    /// Mutes (audio) or blanks (video) the track without giving up the source.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Releases the source. Every clone observes it.
    pub fn stop(&self) {
        self.ended.store(true, Ordering::SeqCst);
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("enabled", &self.is_enabled())
            .field("ended", &self.is_ended())
            .finish()
    }
}

impl PartialEq for LocalTrack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Tracks a new peer link starts sending with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingTracks {
    pub audio: Option<LocalTrack>,
    pub video: Option<LocalTrack>,
}
