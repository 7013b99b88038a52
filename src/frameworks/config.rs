use std::{env, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

/// Directory served for every path other than `/ws`.
pub fn static_dir() -> PathBuf {
    env::var("STATIC_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public"))
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_UPDATES_CAPACITY: usize = 1024;
pub const FRAMES_BROADCAST_CAPACITY: usize = 128;

// 30 Hz projectile simulation.
pub const SIMULATION_TICK_INTERVAL: Duration = Duration::from_millis(1000 / 30);
pub const ZONE_TICK_INTERVAL: Duration = Duration::from_millis(100);
