use super::session::GameSession;
use super::types::{GameEvent, Outbound};
use crate::domain::tuning::Tuning;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Timing and tuning for the world task.
#[derive(Debug, Clone, Copy)]
pub struct WorldSettings {
    /// Projectile simulation period.
    pub simulation_interval: Duration,
    /// Safe zone period.
    pub zone_interval: Duration,
    pub tuning: Tuning,
}

/// Single owner of the game session.
///
/// Inputs and both timers are multiplexed onto this task; each branch runs to
/// completion before the next one is polled, so the session has exactly one
/// writer. Runs until every input sender is dropped or the update consumer is gone.
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: mpsc::Sender<Outbound>,
    settings: WorldSettings,
) {
    let mut session = GameSession::new(settings.tuning, Instant::now());

    let mut simulation = tokio::time::interval(settings.simulation_interval);
    simulation.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut zone = tokio::time::interval(settings.zone_interval);
    zone.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let updates = tokio::select! {
            event = input_rx.recv() => match event {
                Some(event) => session.handle_event(event, Instant::now()),
                None => {
                    info!("input channel closed; world task exiting");
                    break;
                }
            },
            _ = simulation.tick() => session.simulation_tick(Instant::now()),
            _ = zone.tick() => session.zone_tick(Instant::now()),
        };

        for update in updates {
            if world_tx.send(update).await.is_err() {
                warn!("world updates channel closed; world task exiting");
                return;
            }
        }
    }
}
