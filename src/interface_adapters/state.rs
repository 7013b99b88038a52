use crate::domain::PlayerId;
use crate::use_cases::GameEvent;
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast, mpsc, watch};
use tracing::debug;

pub struct AppState {
    // Inputs flowing from the network into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    // Serialized updates meant for every connection.
    pub frames_tx: broadcast::Sender<Utf8Bytes>,
    // Most recent full frames, resent to connections that fell behind.
    pub latest_tx: watch::Sender<LatestFrames>,
    // Serialized updates meant for one connection.
    pub notices: Arc<Notices>,
}

/// Latest serialized snapshot of each kind. Empty until the first one is produced.
#[derive(Debug, Clone, Default)]
pub struct LatestFrames {
    pub zone: Option<Utf8Bytes>,
    pub players: Option<Utf8Bytes>,
    pub bullets: Option<Utf8Bytes>,
}

impl LatestFrames {
    /// Frames to replay after lag: zone first, then players, then bullets.
    pub fn resync(&self) -> Vec<Utf8Bytes> {
        [&self.zone, &self.players, &self.bullets]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Per-connection queues for targeted updates.
///
/// These are unbounded so one-shot notices (elimination, the joiner's zone) are
/// never dropped when a connection is slow; only a handful are ever sent per player.
#[derive(Default)]
pub struct Notices {
    senders: RwLock<HashMap<PlayerId, mpsc::UnboundedSender<Utf8Bytes>>>,
}

impl Notices {
    pub async fn register(&self, player_id: PlayerId) -> mpsc::UnboundedReceiver<Utf8Bytes> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.write().await.insert(player_id, tx);
        rx
    }

    pub async fn unregister(&self, player_id: PlayerId) {
        self.senders.write().await.remove(&player_id);
    }

    /// Queues `text` for `player_id`. Returns false if that connection is gone.
    pub async fn send(&self, player_id: PlayerId, text: Utf8Bytes) -> bool {
        let senders = self.senders.read().await;
        match senders.get(&player_id) {
            Some(tx) => tx.send(text).is_ok(),
            None => {
                debug!(player_id, "notice for unknown connection dropped");
                false
            }
        }
    }
}
