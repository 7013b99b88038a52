// In-memory entity storage for a single session.

use crate::domain::state::{Player, PlayerId, PlayerSnapshot, Projectile, ProjectileSnapshot};
use crate::domain::tuning::PlayerTuning;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// Players in join order plus projectiles in creation order.
///
/// Players are keyed by a join sequence number, so iteration follows the order
/// in which they entered the store regardless of how their ids were assigned.
#[derive(Debug, Default)]
pub struct EntityStore {
    players: BTreeMap<u64, Player>,
    join_seq: HashMap<PlayerId, u64>,
    next_seq: u64,
    projectiles: Vec<Projectile>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a player at a random position inside the spawn rectangle.
    ///
    /// Re-spawning an existing id replaces the previous player.
    pub fn spawn<R: Rng>(
        &mut self,
        id: PlayerId,
        tuning: &PlayerTuning,
        rng: &mut R,
    ) -> Player {
        let player = Player {
            id,
            x: rng.random_range(tuning.spawn_min_x..tuning.spawn_max_x),
            y: rng.random_range(tuning.spawn_min_y..tuning.spawn_max_y),
            health: tuning.max_health,
        };
        self.insert(player.clone());
        player
    }

    /// Adds a player at the end of the join order. Replacing an existing id keeps its slot.
    pub fn insert(&mut self, player: Player) {
        let seq = match self.join_seq.get(&player.id) {
            Some(&seq) => seq,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.join_seq.insert(player.id, seq);
                seq
            }
        };
        self.players.insert(seq, player);
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let seq = self.join_seq.remove(&id)?;
        self.players.remove(&seq)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        let seq = self.join_seq.get(&id)?;
        self.players.get(seq)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        let seq = self.join_seq.get(&id)?;
        self.players.get_mut(seq)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.values_mut()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn all_players(&self) -> Vec<PlayerSnapshot> {
        self.players.values().map(PlayerSnapshot::from).collect()
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    pub fn all_projectiles(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles.iter().map(ProjectileSnapshot::from).collect()
    }

    /// Moves the live projectiles out, leaving the set empty until replaced.
    pub fn take_projectiles(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.projectiles)
    }

    pub fn replace_projectiles(&mut self, projectiles: Vec<Projectile>) {
        self.projectiles = projectiles;
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.join_seq.clear();
        self.projectiles.clear();
    }
}
