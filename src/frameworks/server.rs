// Framework bootstrap for the arena server runtime.

use crate::domain::tuning::Tuning;
use crate::frameworks::config;
use crate::interface_adapters::net::{spawn_update_serializer, ws_handler};
use crate::interface_adapters::state::{AppState, LatestFrames, Notices};
use crate::use_cases::{GameEvent, Outbound, WorldSettings, world_task};

use axum::{Router, extract::ws::Utf8Bytes, routing::get};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::{io::Result, sync::Arc};
use tokio::sync::{broadcast, mpsc, watch};
use tower_http::services::ServeDir;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Serves the game on an already bound listener until the server stops.
pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    run_with_static_dir(listener, config::static_dir()).await
}

pub async fn run_with_static_dir(
    listener: tokio::net::TcpListener,
    static_dir: PathBuf,
) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(&static_dir))
        .with_state(state);

    tracing::info!(%address, static_dir = %static_dir.display(), "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    // input_tx/rx: All client inputs go to the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    // world_tx/rx: domain updates, serialized once by a single consumer.
    let (world_tx, world_rx) = mpsc::channel::<Outbound>(config::WORLD_UPDATES_CAPACITY);
    let (frames_tx, _frames_rx) = broadcast::channel::<Utf8Bytes>(config::FRAMES_BROADCAST_CAPACITY);
    let (latest_tx, _latest_rx) = watch::channel(LatestFrames::default());

    let state = Arc::new(AppState {
        input_tx,
        frames_tx,
        latest_tx,
        notices: Arc::new(Notices::default()),
    });

    spawn_update_serializer(world_rx, &state);

    tokio::spawn(world_task(
        input_rx,
        world_tx,
        WorldSettings {
            simulation_interval: config::SIMULATION_TICK_INTERVAL,
            zone_interval: config::ZONE_TICK_INTERVAL,
            tuning: Tuning::default(),
        },
    ));

    state
}
