// The game session aggregate: every mutation of game state goes through here.

use super::types::{GameEvent, Outbound, WorldUpdate};
use crate::domain::systems::movement;
use crate::domain::systems::projectiles::{self, ProjectileConfig};
use crate::domain::systems::zone::ZoneController;
use crate::domain::tuning::Tuning;
use crate::domain::{EntityStore, PlayerId, PlayerInput, SafeZone};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::Instant;
use tracing::{debug, info};

/// Players, projectiles and the safe zone of the single running game.
///
/// Handlers return the updates to publish; the caller decides how they are delivered.
pub struct GameSession {
    tuning: Tuning,
    store: EntityStore,
    zone: ZoneController,
    started_at: Instant,
    rng: StdRng,
}

impl GameSession {
    pub fn new(tuning: Tuning, now: Instant) -> Self {
        Self::with_rng(tuning, now, StdRng::from_os_rng())
    }

    pub fn with_rng(tuning: Tuning, now: Instant, rng: StdRng) -> Self {
        Self {
            tuning,
            store: EntityStore::new(),
            zone: ZoneController::new(tuning.zone),
            started_at: now,
            rng,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn zone(&self) -> SafeZone {
        self.zone.zone()
    }

    #[cfg(test)]
    pub(crate) fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn handle_event(&mut self, event: GameEvent, now: Instant) -> Vec<Outbound> {
        match event {
            GameEvent::Join { player_id } => self.join(player_id),
            GameEvent::Leave { player_id } => self.leave(player_id, now),
            GameEvent::Input { player_id, input } => self.apply_input(player_id, input),
        }
    }

    pub fn join(&mut self, player_id: PlayerId) -> Vec<Outbound> {
        let player = self.store.spawn(player_id, &self.tuning.player, &mut self.rng);
        info!(player_id, x = player.x, y = player.y, "player joined");

        vec![
            Outbound::to_player(player_id, WorldUpdate::SafeZone(self.zone.zone())),
            self.players_update(),
        ]
    }

    pub fn leave(&mut self, player_id: PlayerId, now: Instant) -> Vec<Outbound> {
        if self.store.remove(player_id).is_some() {
            info!(player_id, "player left");
        } else {
            debug!(player_id, "leave for player not in session");
        }

        let mut out = vec![self.players_update()];
        if self.store.is_empty() {
            out.extend(self.reset(now));
        }
        out
    }

    pub fn apply_input(&mut self, player_id: PlayerId, input: PlayerInput) -> Vec<Outbound> {
        match input {
            PlayerInput::Move { dx, dy } => {
                let speed = self.tuning.player.move_speed;
                if movement::apply_move(&mut self.store, player_id, dx, dy, speed) {
                    vec![self.players_update()]
                } else {
                    Vec::new()
                }
            }
            PlayerInput::Shoot { dx, dy } => {
                movement::fire(&mut self.store, player_id, dx, dy);
                Vec::new()
            }
        }
    }

    pub fn simulation_tick(&mut self, now: Instant) -> Vec<Outbound> {
        let outcome = projectiles::tick_projectiles(
            &mut self.store,
            ProjectileConfig {
                speed: self.tuning.projectile.speed,
                damage: self.tuning.projectile.damage,
                hit_radius: self.tuning.player.hit_radius,
            },
        );

        let mut out = vec![Outbound::all(WorldUpdate::Projectiles(
            self.store.all_projectiles(),
        ))];
        if outcome.hits > 0 {
            out.extend(self.eliminations(&outcome.eliminated, now));
        }
        out
    }

    pub fn zone_tick(&mut self, now: Instant) -> Vec<Outbound> {
        let elapsed = now.saturating_duration_since(self.started_at);
        let outcome = self.zone.tick(elapsed, &mut self.store);

        let mut out = Vec::new();
        if outcome.radius_changed {
            out.push(Outbound::all(WorldUpdate::SafeZone(self.zone.zone())));
        }
        out.extend(self.eliminations(&outcome.eliminated, now));
        out
    }

    /// Returns the session to its initial state, keeping the rng.
    pub fn reset(&mut self, now: Instant) -> Vec<Outbound> {
        self.store.clear();
        self.zone.reset();
        self.started_at = now;
        info!("session reset");

        vec![Outbound::all(WorldUpdate::SafeZone(self.zone.zone()))]
    }

    // Notices for removed players, the player snapshot, and a reset if nobody is left.
    fn eliminations(&mut self, eliminated: &[PlayerId], now: Instant) -> Vec<Outbound> {
        let mut out: Vec<Outbound> = eliminated
            .iter()
            .map(|&id| Outbound::to_player(id, WorldUpdate::Eliminated))
            .collect();
        out.push(self.players_update());
        if !eliminated.is_empty() && self.store.is_empty() {
            out.extend(self.reset(now));
        }
        out
    }

    fn players_update(&self) -> Outbound {
        Outbound::all(WorldUpdate::Players(self.store.all_players()))
    }
}
