/// Gameplay tuning for players.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Distance covered by a single move intent, per axis unit.
    pub move_speed: f32,

    /// Health a freshly spawned player starts with.
    pub max_health: f32,

    /// Projectiles closer than this to a player's center hit it.
    pub hit_radius: f32,

    /// Spawn rectangle, half-open on the upper bounds.
    pub spawn_min_x: f32,
    pub spawn_max_x: f32,
    pub spawn_min_y: f32,
    pub spawn_max_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            max_health: 100.0,
            hit_radius: 10.0,
            spawn_min_x: 100.0,
            spawn_max_x: 700.0,
            spawn_min_y: 100.0,
            spawn_max_y: 500.0,
        }
    }
}
