pub use roomlink_core::{ConnectionId, RoomId};

pub mod model {
    pub use roomlink_core::model::*;
    pub use roomlink_core::{ProtocolError, utils};
}

#[cfg(feature = "server")]
pub mod server {
    pub use roomlink_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use roomlink_client::*;
}
