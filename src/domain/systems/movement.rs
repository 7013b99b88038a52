use crate::domain::state::{PlayerId, Projectile};
use crate::domain::store::EntityStore;
use tracing::debug;

/// Applies one move intent. Returns false when the player no longer exists.
///
/// Components are scaled by `speed` as sent; there is no range check and no
/// bounds clamp, players may walk off the visible arena.
pub fn apply_move(
    store: &mut EntityStore,
    player_id: PlayerId,
    dx: f32,
    dy: f32,
    speed: f32,
) -> bool {
    let Some(p) = store.get_mut(player_id) else {
        return false;
    };
    p.x += dx * speed;
    p.y += dy * speed;
    true
}

/// Spawns a projectile at the shooter's current position.
///
/// The direction is stored without normalization. Returns false when the
/// shooter no longer exists.
pub fn fire(store: &mut EntityStore, player_id: PlayerId, dx: f32, dy: f32) -> bool {
    let Some(p) = store.get(player_id) else {
        return false;
    };
    let projectile = Projectile {
        x: p.x,
        y: p.y,
        dx,
        dy,
        owner: player_id,
    };
    debug!(player_id, dx, dy, "projectile fired");
    store.add_projectile(projectile);
    true
}
