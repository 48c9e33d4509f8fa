use crate::model::SdpType;
use thiserror::Error;

/// Rejections raised while decoding or validating wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("invalid connection id '{0}'")]
    InvalidConnectionId(String),

    #[error("{payload} envelope carries a '{found}' description")]
    DescriptionKindMismatch { payload: &'static str, found: SdpType },
}
