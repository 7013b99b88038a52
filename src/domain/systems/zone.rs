use crate::domain::state::{PlayerId, SafeZone};
use crate::domain::store::EntityStore;
use crate::domain::tuning::ZoneTuning;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    /// Waiting for the shrink delay to pass.
    Stable,
    /// Shrinking toward the floor radius. Never left until the session resets.
    Shrinking,
}

#[derive(Debug, Default, PartialEq)]
pub struct ZoneTickOutcome {
    pub radius_changed: bool,
    pub eliminated: Vec<PlayerId>,
}

/// Owns the safe zone and its phase for one session.
#[derive(Debug)]
pub struct ZoneController {
    tuning: ZoneTuning,
    zone: SafeZone,
    phase: ZonePhase,
}

impl ZoneController {
    pub fn new(tuning: ZoneTuning) -> Self {
        Self {
            tuning,
            zone: initial_zone(&tuning),
            phase: ZonePhase::Stable,
        }
    }

    pub fn zone(&self) -> SafeZone {
        self.zone
    }

    pub fn phase(&self) -> ZonePhase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.zone = initial_zone(&self.tuning);
        self.phase = ZonePhase::Stable;
    }

    /// Runs one zone tick. `elapsed` is the time since the session started.
    pub fn tick(&mut self, elapsed: Duration, store: &mut EntityStore) -> ZoneTickOutcome {
        let mut outcome = ZoneTickOutcome::default();

        if self.phase == ZonePhase::Stable && elapsed > self.tuning.shrink_delay {
            self.phase = ZonePhase::Shrinking;
            info!(elapsed_ms = elapsed.as_millis() as u64, "safe zone shrinking");
        }

        if self.phase == ZonePhase::Shrinking && self.zone.radius > self.tuning.min_radius {
            self.zone.radius =
                (self.zone.radius - self.tuning.shrink_per_tick).max(self.tuning.min_radius);
            outcome.radius_changed = true;
        }

        let zone = self.zone;
        for p in store.players_mut() {
            if zone.contains(p.x, p.y) {
                continue;
            }
            p.health -= self.tuning.damage_per_tick;
            if p.health <= 0.0 {
                outcome.eliminated.push(p.id);
            }
        }

        for &player_id in &outcome.eliminated {
            store.remove(player_id);
            info!(player_id, "player eliminated by safe zone");
        }

        if outcome.radius_changed && zone.radius <= self.tuning.min_radius {
            debug!(radius = zone.radius, "safe zone reached minimum radius");
        }

        outcome
    }
}

fn initial_zone(tuning: &ZoneTuning) -> SafeZone {
    SafeZone {
        x: tuning.center_x,
        y: tuning.center_y,
        radius: tuning.initial_radius,
    }
}
