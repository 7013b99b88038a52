// Domain-level simulation entities and input/snapshot types.

/// Opaque identity shared by a connection and the player it controls.
pub type PlayerId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    // No upper clamp; only the lower bound (elimination) is enforced.
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    // Expected to be a unit vector, but taken as sent by the client.
    pub dx: f32,
    pub dy: f32,
    pub owner: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeZone {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl SafeZone {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        distance(self.x, self.y, x, y) <= self.radius
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub owner: PlayerId,
}

/// Intent sent by a client; applied by the world task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerInput {
    Move { dx: f32, dy: f32 },
    Shoot { dx: f32, dy: f32 },
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            x: p.x,
            y: p.y,
            health: p.health,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.x,
            y: p.y,
            dx: p.dx,
            dy: p.dy,
            owner: p.owner,
        }
    }
}

pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}
