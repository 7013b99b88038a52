// Use cases layer: application workflows for the game server.

pub mod game;
pub mod session;
pub mod types;

pub use game::{WorldSettings, world_task};
pub use session::GameSession;
pub use types::{GameEvent, Outbound, Recipient, WorldUpdate};
