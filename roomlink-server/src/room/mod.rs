mod participant;
mod registry_actor;
mod room;
mod room_command;
mod room_manager;
mod room_registry;

pub use participant::*;
pub use room::*;
pub use room_command::*;
pub use room_manager::*;
pub use room_registry::*;
