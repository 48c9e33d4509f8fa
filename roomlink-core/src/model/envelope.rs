use crate::ProtocolError;
use crate::model::ConnectionId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

impl fmt::Display for SdpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SdpType::Offer => "offer",
            SdpType::Answer => "answer",
            SdpType::Pranswer => "pranswer",
            SdpType::Rollback => "rollback",
        };
        f.write_str(s)
    }
}

/// Session description in the shape browsers put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Trickled connectivity candidate, `RTCIceCandidateInit` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalPayload {
    Offer {
        signal: SessionDescription,
        user_name: String,
    },
    Answer {
        signal: SessionDescription,
    },
    IceCandidate {
        signal: IceCandidate,
    },
}

impl SignalPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            SignalPayload::Offer { .. } => "offer",
            SignalPayload::Answer { .. } => "answer",
            SignalPayload::IceCandidate { .. } => "ice-candidate",
        }
    }
}

/// Point-to-point negotiation message. `from` is stamped by the relay;
/// whatever a client puts there is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEnvelope {
    pub to: ConnectionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ConnectionId>,
    #[serde(flatten)]
    pub payload: SignalPayload,
}

impl SignalEnvelope {
    pub fn new(to: ConnectionId, payload: SignalPayload) -> Self {
        Self {
            to,
            from: None,
            payload,
        }
    }

    /// Checks that offers carry offer descriptions and answers carry answers.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let (payload, expected, desc) = match &self.payload {
            SignalPayload::Offer { signal, .. } => ("offer", SdpType::Offer, signal),
            SignalPayload::Answer { signal } => ("answer", SdpType::Answer, signal),
            SignalPayload::IceCandidate { .. } => return Ok(()),
        };
        if desc.sdp_type != expected {
            return Err(ProtocolError::DescriptionKindMismatch {
                payload,
                found: desc.sdp_type,
            });
        }
        Ok(())
    }
}
