use crate::media::{LocalTrack, RemoteTrack};
use crate::transport::{LinkSetup, PeerTransport, TransportEvent, TransportFactory};
use anyhow::{Context, Result};
use async_trait::async_trait;
use roomlink_core::{IceCandidate, IceServerConfig, SdpType, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::{RTCRtpTransceiver, RTCRtpTransceiverInit};
use webrtc::track::track_remote::TrackRemote;

/// Builds `webrtc` peer connections. The codec/interceptor API is created
/// once and shared by every link.
pub struct WebRtcTransportFactory {
    api: Arc<API>,
}

impl WebRtcTransportFactory {
    pub fn new() -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        Ok(Self { api: Arc::new(api) })
    }
}

#[async_trait]
impl TransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        setup: LinkSetup,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Arc<dyn PeerTransport>> {
        let transport = WebRtcTransport::new(&self.api, setup, events).await?;
        Ok(Arc::new(transport))
    }
}

pub struct WebRtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
    video_sender: Arc<RTCRtpSender>,
}

impl WebRtcTransport {
    pub async fn new(
        api: &API,
        setup: LinkSetup,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Self> {
        let LinkSetup {
            peer,
            serial,
            ice_servers,
            outgoing,
        } = setup;

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers.into_iter().map(to_rtc_ice_server).collect(),
            ..Default::default()
        };
        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Audio is fixed for the lifetime of the link.
        match &outgoing.audio {
            Some(track) => {
                let sender = peer_connection.add_track(track.as_track_local()).await?;
                drain_rtcp(sender);
            }
            None => {
                peer_connection
                    .add_transceiver_from_kind(
                        RTPCodecType::Audio,
                        Some(RTCRtpTransceiverInit {
                            direction: RTCRtpTransceiverDirection::Recvonly,
                            send_encodings: vec![],
                        }),
                    )
                    .await?;
            }
        }

        // Video always gets a sending slot so a screen can be swapped in later.
        let video_sender = match &outgoing.video {
            Some(track) => peer_connection.add_track(track.as_track_local()).await?,
            None => {
                let transceiver = peer_connection
                    .add_transceiver_from_kind(
                        RTPCodecType::Video,
                        Some(RTCRtpTransceiverInit {
                            direction: RTCRtpTransceiverDirection::Sendrecv,
                            send_encodings: vec![],
                        }),
                    )
                    .await?;
                transceiver.sender().await
            }
        };
        drain_rtcp(video_sender.clone());

        let state_tx = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state for {}: {:?}", peer, s);
                    if s == RTCPeerConnectionState::Failed {
                        let _ = tx.send(TransportEvent::ConnectionFailed { peer, serial });
                    }
                })
            },
        ));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let init = match candidate.to_json() {
                    Ok(init) => init,
                    Err(e) => {
                        warn!("Unserializable local candidate for {}: {}", peer, e);
                        return;
                    }
                };
                let _ = tx.send(TransportEvent::CandidateGenerated {
                    peer,
                    serial,
                    candidate: from_rtc_candidate(init),
                });
            })
        }));

        let track_tx = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    debug!("Remote {} track '{}' from {}", track.kind(), track.id(), peer);
                    let _ = tx.send(TransportEvent::TrackAvailable {
                        peer,
                        serial,
                        track: RemoteTrack::from_webrtc(track),
                    });
                })
            },
        ));

        Ok(Self {
            peer_connection,
            video_sender,
        })
    }
}

#[async_trait]
impl PeerTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc_description(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_rtc_candidate(candidate))
            .await
            .context("Failed to apply remote ICE candidate")?;
        Ok(())
    }

    async fn replace_video_track(&self, track: Option<LocalTrack>) -> Result<()> {
        self.video_sender
            .replace_track(track.map(|t| t.as_track_local()))
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Interceptors only run while someone reads RTCP off the sender.
fn drain_rtcp(sender: Arc<RTCRtpSender>) {
    tokio::spawn(async move { while sender.read_rtcp().await.is_ok() {} });
}

fn to_rtc_ice_server(server: IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: server.urls,
        username: server.username.unwrap_or_default(),
        credential: server.credential.unwrap_or_default(),
    }
}

fn to_rtc_description(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp)?,
        SdpType::Pranswer => RTCSessionDescription::pranswer(desc.sdp)?,
        SdpType::Rollback => {
            let mut rollback = RTCSessionDescription::default();
            rollback.sdp_type = RTCSdpType::Rollback;
            rollback
        }
    };
    Ok(rtc)
}

fn to_rtc_candidate(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
