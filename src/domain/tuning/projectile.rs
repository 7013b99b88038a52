/// Gameplay tuning for projectiles.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Distance travelled per simulation tick along the direction vector.
    pub speed: f32,

    /// Health removed from a player on hit.
    pub damage: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 6.0,
            damage: 25.0,
        }
    }
}
