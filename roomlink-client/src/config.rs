use roomlink_core::IceServerConfig;
use roomlink_core::utils::default_ice_servers;
use std::time::Duration;

pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:3456/ws";
pub const DEFAULT_NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub signaling_url: String,
    /// A link that has not reached `Connected` within this window is closed
    /// and reported as failed. `None` waits forever.
    pub negotiation_timeout: Option<Duration>,
    /// Used until (or unless) the server advertises its own ICE servers.
    pub fallback_ice_servers: Vec<IceServerConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            negotiation_timeout: Some(DEFAULT_NEGOTIATION_TIMEOUT),
            fallback_ice_servers: default_ice_servers(),
        }
    }
}
