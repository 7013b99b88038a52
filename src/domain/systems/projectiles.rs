use crate::domain::state::{PlayerId, Projectile, distance};
use crate::domain::store::EntityStore;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub damage: f32,
    pub hit_radius: f32,
}

#[derive(Debug, Default, PartialEq)]
pub struct ProjectileTickOutcome {
    pub hits: usize,
    pub eliminated: Vec<PlayerId>,
}

pub fn tick_projectiles(store: &mut EntityStore, cfg: ProjectileConfig) -> ProjectileTickOutcome {
    let mut outcome = ProjectileTickOutcome::default();
    let projectiles = store.take_projectiles();
    let mut retained: Vec<Projectile> = Vec::with_capacity(projectiles.len());

    for mut p in projectiles {
        p.x += p.dx * cfg.speed;
        p.y += p.dy * cfg.speed;

        // First living non-owner in iteration order takes the hit; one target per projectile.
        let victim = store
            .players()
            .find(|e| e.id != p.owner && distance(e.x, e.y, p.x, p.y) < cfg.hit_radius)
            .map(|e| e.id);

        let Some(victim_id) = victim else {
            retained.push(p);
            continue;
        };

        outcome.hits += 1;
        let mut victim_health = 0.0;
        if let Some(e) = store.get_mut(victim_id) {
            e.health -= cfg.damage;
            victim_health = e.health;
        }

        info!(victim_id, shooter_id = p.owner, victim_health, "player hit");

        if victim_health <= 0.0 {
            store.remove(victim_id);
            outcome.eliminated.push(victim_id);
            info!(player_id = victim_id, shooter_id = p.owner, "player eliminated");
        }
    }

    // Only the lower bounds are culled; projectiles past the right/bottom edge keep flying.
    retained.retain(|p| p.x >= 0.0 && p.y >= 0.0);
    store.replace_projectiles(retained);

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::Player;

    const CFG: ProjectileConfig = ProjectileConfig {
        speed: 6.0,
        damage: 25.0,
        hit_radius: 10.0,
    };

    fn player(id: PlayerId, x: f32, y: f32, health: f32) -> Player {
        Player { id, x, y, health }
    }

    fn projectile(x: f32, y: f32, dx: f32, dy: f32, owner: PlayerId) -> Projectile {
        Projectile {
            x,
            y,
            dx,
            dy,
            owner,
        }
    }

    #[test]
    fn projectile_advances_linearly_until_removed() {
        let mut store = EntityStore::new();
        store.add_projectile(projectile(10.0, 20.0, 0.6, 0.8, 1));

        for n in 1..=20 {
            tick_projectiles(&mut store, CFG);
            let snap = store.all_projectiles();
            assert_eq!(snap.len(), 1);
            let expected_x = 10.0 + n as f32 * 0.6 * 6.0;
            let expected_y = 20.0 + n as f32 * 0.8 * 6.0;
            assert!((snap[0].x - expected_x).abs() < 1e-3);
            assert!((snap[0].y - expected_y).abs() < 1e-3);
        }
    }

    #[test]
    fn shot_hits_target_after_closing_distance() {
        let mut store = EntityStore::new();
        store.insert(player(1, 100.0, 100.0, 100.0));
        store.insert(player(2, 130.0, 100.0, 100.0));
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 1));

        // ceil(30 / 6) ticks.
        let mut hits = 0;
        for _ in 0..5 {
            hits += tick_projectiles(&mut store, CFG).hits;
        }

        assert_eq!(hits, 1);
        assert_eq!(store.get(2).expect("target").health, 75.0);
        assert_eq!(store.get(1).expect("shooter").health, 100.0);
        assert!(store.all_projectiles().is_empty());
    }

    #[test]
    fn owner_is_never_hit_by_own_projectile() {
        let mut store = EntityStore::new();
        store.insert(player(1, 100.0, 100.0, 100.0));
        store.add_projectile(projectile(100.0, 100.0, 0.0, 0.0, 1));

        let outcome = tick_projectiles(&mut store, CFG);

        assert_eq!(outcome.hits, 0);
        assert_eq!(store.get(1).expect("owner").health, 100.0);
        assert_eq!(store.projectile_count(), 1);
    }

    #[test]
    fn only_first_player_in_order_is_hit() {
        let mut store = EntityStore::new();
        store.insert(player(2, 106.0, 100.0, 100.0));
        store.insert(player(3, 106.0, 101.0, 100.0));
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 1));

        let outcome = tick_projectiles(&mut store, CFG);

        assert_eq!(outcome.hits, 1);
        assert_eq!(store.get(2).expect("first").health, 75.0);
        assert_eq!(store.get(3).expect("second").health, 100.0);
    }

    #[test]
    fn earlier_joiner_wins_the_tie_even_with_a_higher_id() {
        let mut store = EntityStore::new();
        store.insert(player(9, 106.0, 100.0, 100.0));
        store.insert(player(4, 106.0, 100.0, 100.0));
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 1));

        tick_projectiles(&mut store, CFG);

        assert_eq!(store.get(9).expect("earlier joiner").health, 75.0);
        assert_eq!(store.get(4).expect("later joiner").health, 100.0);
    }

    #[test]
    fn lethal_hit_removes_player_in_same_tick() {
        let mut store = EntityStore::new();
        store.insert(player(2, 106.0, 100.0, 25.0));
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 1));
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 1));

        let outcome = tick_projectiles(&mut store, CFG);

        assert_eq!(outcome.eliminated, vec![2]);
        assert!(store.get(2).is_none());
        assert!(store.all_players().is_empty());
        // The second projectile found no target once the first one eliminated it.
        assert_eq!(outcome.hits, 1);
        assert_eq!(store.projectile_count(), 1);
    }

    #[test]
    fn culls_only_negative_coordinates() {
        let mut store = EntityStore::new();
        store.add_projectile(projectile(2.0, 50.0, -1.0, 0.0, 1));
        store.add_projectile(projectile(50.0, 2.0, 0.0, -1.0, 1));
        store.add_projectile(projectile(5000.0, 5000.0, 1.0, 1.0, 1));

        tick_projectiles(&mut store, CFG);

        let snap = store.all_projectiles();
        assert_eq!(snap.len(), 1);
        assert!(snap[0].x > 5000.0);
    }

    #[test]
    fn non_unit_direction_is_not_renormalized() {
        let mut store = EntityStore::new();
        store.add_projectile(projectile(0.0, 0.0, 3.0, 0.0, 1));

        tick_projectiles(&mut store, CFG);

        assert_eq!(store.all_projectiles()[0].x, 18.0);
    }

    #[test]
    fn orphan_projectiles_keep_flying() {
        let mut store = EntityStore::new();
        store.add_projectile(projectile(100.0, 100.0, 1.0, 0.0, 77));
        store.insert(player(2, 118.0, 100.0, 100.0));

        tick_projectiles(&mut store, CFG);
        let outcome = tick_projectiles(&mut store, CFG);

        assert_eq!(outcome.hits, 1);
        assert_eq!(store.get(2).expect("target").health, 75.0);
    }
}
