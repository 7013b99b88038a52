use std::time::Duration;

/// Gameplay tuning for the shrinking safe zone.
///
/// Rates are expressed per zone tick, so changing the zone tick interval changes
/// the effective shrink speed and damage per second.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTuning {
    /// Zone center, fixed for the lifetime of a session.
    pub center_x: f32,
    pub center_y: f32,

    /// Radius at session start.
    pub initial_radius: f32,

    /// The zone never shrinks below this radius.
    pub min_radius: f32,

    /// Time after session start before shrinking begins.
    pub shrink_delay: Duration,

    /// Radius lost per zone tick while shrinking.
    pub shrink_per_tick: f32,

    /// Health lost per zone tick while outside the zone.
    pub damage_per_tick: f32,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            center_y: 300.0,
            initial_radius: 250.0,
            min_radius: 100.0,
            shrink_delay: Duration::from_secs(10),
            shrink_per_tick: 0.2,
            damage_per_tick: 0.3,
        }
    }
}
