use crate::domain::PlayerId;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates the id for a new connection; it doubles as the player's identity.
///
/// Ids are process-unique and increase with every call. Join order is tracked
/// separately by the entity store.
pub fn next_player_id() -> PlayerId {
    NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = next_player_id();
        let b = next_player_id();
        assert!(b > a);
    }
}
