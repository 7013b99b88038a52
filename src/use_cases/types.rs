// Use-case level inputs/outputs for the game loop.

use crate::domain::{PlayerId, PlayerInput, PlayerSnapshot, ProjectileSnapshot, SafeZone};

#[derive(Debug, Clone)]
pub enum GameEvent {
    Join { player_id: PlayerId },
    Leave { player_id: PlayerId },
    Input { player_id: PlayerId, input: PlayerInput },
}

/// Who an update is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    All,
    Player(PlayerId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldUpdate {
    Players(Vec<PlayerSnapshot>),
    Projectiles(Vec<ProjectileSnapshot>),
    SafeZone(SafeZone),
    Eliminated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub update: WorldUpdate,
}

impl Outbound {
    pub fn all(update: WorldUpdate) -> Self {
        Self {
            to: Recipient::All,
            update,
        }
    }

    pub fn to_player(player_id: PlayerId, update: WorldUpdate) -> Self {
        Self {
            to: Recipient::Player(player_id),
            update,
        }
    }
}
