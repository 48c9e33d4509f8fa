use roomlink_core::ProtocolError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("signaling connection failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("signaling channel closed")]
    SignalingClosed,

    #[error("mesh engine has stopped")]
    EngineStopped,

    #[error("not in a room")]
    NotJoined,

    #[error("transport setup failed: {0}")]
    TransportSetup(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("permission to capture {0} was denied")]
    Denied(String),

    #[error("no device available for {0}")]
    Unavailable(String),
}

/// Why a peer link ended without the remote side leaving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NegotiationTimeout,
    Transport(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NegotiationTimeout => f.write_str("negotiation timed out"),
            FailureReason::Transport(e) => write!(f, "transport failure: {e}"),
        }
    }
}
