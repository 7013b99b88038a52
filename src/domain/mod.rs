// Domain layer: core simulation types and rules.

pub mod state;
pub mod store;
pub mod systems;
pub mod tuning;

pub use state::{
    Player, PlayerId, PlayerInput, PlayerSnapshot, Projectile, ProjectileSnapshot, SafeZone,
};
pub use store::EntityStore;
