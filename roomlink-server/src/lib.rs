mod config;
mod room;
mod server;
mod signaling;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use room::*;
pub use server::{app, serve};
pub use signaling::*;
