pub mod player;
pub mod projectile;
pub mod zone;

pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;
pub use zone::ZoneTuning;

/// All gameplay tuning used by a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
    pub zone: ZoneTuning,
}
