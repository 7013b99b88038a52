use crate::domain::{PlayerId, PlayerInput};
use crate::interface_adapters::protocol::{ClientMessage, ServerMessage};
use crate::interface_adapters::state::{AppState, LatestFrames, Notices};
use crate::interface_adapters::utils::ids::next_player_id;
use crate::use_cases::{GameEvent, Outbound, Recipient, WorldUpdate};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    UpdatesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

/// Serializes each world update once and routes the shared bytes.
///
/// Updates for everyone go on the frames broadcast; updates for one player go on
/// that player's notice queue. Snapshots of every kind refresh `latest_tx`.
pub async fn update_serializer(
    mut world_rx: mpsc::Receiver<Outbound>,
    frames_tx: broadcast::Sender<Utf8Bytes>,
    latest_tx: watch::Sender<LatestFrames>,
    notices: Arc<Notices>,
) {
    while let Some(outbound) = world_rx.recv().await {
        let msg = ServerMessage::from(&outbound.update);
        let text = match serde_json::to_string(&msg) {
            Ok(txt) => Utf8Bytes::from(txt),
            Err(e) => {
                error!(error = ?e, "failed to serialize world update");
                continue;
            }
        };

        match &outbound.update {
            WorldUpdate::SafeZone(_) => {
                latest_tx.send_modify(|latest| latest.zone = Some(text.clone()));
            }
            WorldUpdate::Players(_) => {
                latest_tx.send_modify(|latest| latest.players = Some(text.clone()));
            }
            WorldUpdate::Projectiles(_) => {
                latest_tx.send_modify(|latest| latest.bullets = Some(text.clone()));
            }
            WorldUpdate::Eliminated => {}
        }

        match outbound.to {
            Recipient::All => {
                // No subscribers is fine; nobody is connected.
                let _ = frames_tx.send(text);
            }
            Recipient::Player(player_id) => {
                notices.send(player_id, text).await;
            }
        }
    }

    warn!("world updates channel closed; serializer exiting");
}

pub fn spawn_update_serializer(world_rx: mpsc::Receiver<Outbound>, state: &AppState) {
    tokio::spawn(update_serializer(
        world_rx,
        state.frames_tx.clone(),
        state.latest_tx.clone(),
        Arc::clone(&state.notices),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| {
        let player_id = next_player_id();
        handle_socket(socket, state, player_id).instrument(info_span!("conn", player_id))
    })
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, player_id: PlayerId) {
    let mut ctx = match bootstrap_connection(&state, player_id).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!(error = ?e, "failed to bootstrap connection");
            let _ = socket
                .send(Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: "bootstrap failed".into(),
                })))
                .await;
            let _ = socket.close().await;
            return;
        }
    };

    // Tell the client "This is who you are".
    // Nothing else is written to the socket until the client loop starts.
    if let Err(e) = send_message(&mut socket, &ServerMessage::identity(player_id)).await {
        warn!(error = ?e, "failed to send identity");
        if let Err(e) = ctx.disconnect_cleanup().await {
            warn!(error = ?e, "error during disconnect cleanup");
        }
        return;
    }

    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket.send(Message::Text(txt.into())).await?;
    Ok(bytes)
}

struct ConnCtx {
    player_id: PlayerId,
    input_tx: mpsc::Sender<GameEvent>,
    frames_rx: broadcast::Receiver<Utf8Bytes>,
    latest_rx: watch::Receiver<LatestFrames>,
    notices: Arc<Notices>,
    notices_rx: mpsc::UnboundedReceiver<Utf8Bytes>,

    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,
    lagged: u64,
    lag_recovery_count: u64,

    invalid_json: u32,

    last_input_full_log: Instant,
    last_lag_log: Instant,
    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(state: &AppState, player_id: PlayerId) -> Result<ConnCtx, NetError> {
    // Subscribe before Join so neither the broadcast nor the joiner's zone is missed.
    let frames_rx = state.frames_tx.subscribe();
    let latest_rx = state.latest_tx.subscribe();
    let notices_rx = state.notices.register(player_id).await;

    // Queue Join before the identity frame is written so the store sees players as they arrive.
    if state
        .input_tx
        .send(GameEvent::Join { player_id })
        .await
        .is_err()
    {
        state.notices.unregister(player_id).await;
        return Err(NetError::InputClosed);
    }

    let now = Instant::now() - LOG_THROTTLE;
    Ok(ConnCtx {
        player_id,
        input_tx: state.input_tx.clone(),
        frames_rx,
        latest_rx,
        notices: Arc::clone(&state.notices),
        notices_rx,

        msgs_in: 0,
        msgs_out: 0,
        bytes_in: 0,
        bytes_out: 0,
        lagged: 0,
        lag_recovery_count: 0,

        invalid_json: 0,

        last_input_full_log: now,
        last_lag_log: now,
        last_invalid_input_log: now,

        close_frame: None,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let disconnect: bool = tokio::select! {
            incoming = socket.recv() => match ctx.handle_incoming(incoming) {
                Ok(LoopControl::Continue) => false,
                Ok(LoopControl::Disconnect) => true,
                Err(e) => {
                    fatal = Some(e);
                    true
                }
            },

            notice = ctx.notices_rx.recv() => match notice {
                Some(text) => match ctx.forward_frame(text, socket).await {
                    LoopControl::Continue => false,
                    LoopControl::Disconnect => true,
                },
                None => {
                    fatal = Some(NetError::UpdatesClosed);
                    true
                }
            },

            frame = ctx.frames_rx.recv() => match frame {
                Ok(text) => match ctx.forward_frame(text, socket).await {
                    LoopControl::Continue => false,
                    LoopControl::Disconnect => true,
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    ctx.lagged += n;
                    if should_log(&mut ctx.last_lag_log) {
                        warn!(missed = n, "updates lagged; sending snapshot");
                    }
                    match ctx.resync(socket).await {
                        LoopControl::Continue => false,
                        LoopControl::Disconnect => true,
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    fatal = Some(NetError::UpdatesClosed);
                    true
                }
            },
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = ctx.disconnect_cleanup().await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl ConnCtx {
    fn handle_incoming(
        &mut self,
        incoming: Option<Result<Message, Error>>,
    ) -> Result<LoopControl, NetError> {
        let player_id = self.player_id;
        match incoming {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    self.msgs_in += 1;
                    self.bytes_in += text.len() as u64;

                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => self.forward_input(msg.into()),
                        Err(parse_err) => {
                            self.invalid_json += 1;
                            if should_log(&mut self.last_invalid_input_log) {
                                warn!(
                                    player_id,
                                    bytes = text.len(),
                                    error = %parse_err,
                                    "failed to parse client message"
                                );
                            }

                            if self.invalid_json > MAX_INVALID_JSON {
                                self.close_frame = Some(CloseFrame {
                                    code: close_code::POLICY,
                                    reason: "too many invalid messages".into(),
                                });
                                return Ok(LoopControl::Disconnect);
                            }

                            Ok(LoopControl::Continue)
                        }
                    }
                }
                Message::Binary(_) => {
                    self.close_frame = Some(CloseFrame {
                        code: close_code::UNSUPPORTED,
                        reason: "binary messages not supported".into(),
                    });
                    Ok(LoopControl::Disconnect)
                }
                Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
                Message::Close(_) => Ok(LoopControl::Disconnect),
            },
            Some(Err(e)) => {
                warn!(player_id, error = %e, "websocket recv error");
                Ok(LoopControl::Disconnect)
            }
            None => {
                info!(player_id, "websocket closed");
                Ok(LoopControl::Disconnect)
            }
        }
    }

    // Inputs are forwarded untouched; the world task ignores them once the player is gone.
    fn forward_input(&mut self, input: PlayerInput) -> Result<LoopControl, NetError> {
        let player_id = self.player_id;
        match self.input_tx.try_send(GameEvent::Input { player_id, input }) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(mpsc::error::TrySendError::Full(_evt)) => {
                if should_log(&mut self.last_input_full_log) {
                    warn!(player_id, "input channel full; dropping input");
                }
                Ok(LoopControl::Continue)
            }
            Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::InputClosed),
        }
    }

    async fn forward_frame(&mut self, text: Utf8Bytes, socket: &mut WebSocket) -> LoopControl {
        let bytes_len = text.len();
        match socket.send(Message::Text(text)).await.map_err(NetError::Ws) {
            Ok(()) => {
                self.msgs_out += 1;
                self.bytes_out += bytes_len as u64;
                LoopControl::Continue
            }
            Err(err) => {
                warn!(error = ?err, "failed to send update");
                LoopControl::Disconnect
            }
        }
    }

    // Resync strategy: replay the latest zone, players and bullets frames.
    async fn resync(&mut self, socket: &mut WebSocket) -> LoopControl {
        let frames = self.latest_rx.borrow().resync();
        if frames.is_empty() {
            if should_log(&mut self.last_lag_log) {
                warn!("snapshot unavailable during lag recovery");
            }
            return LoopControl::Continue;
        }

        self.lag_recovery_count += 1;
        for text in frames {
            if let LoopControl::Disconnect = self.forward_frame(text, socket).await {
                return LoopControl::Disconnect;
            }
        }
        debug!(
            player_id = self.player_id,
            count = self.lag_recovery_count,
            "sent lag recovery snapshot"
        );
        LoopControl::Continue
    }

    async fn disconnect_cleanup(&mut self) -> Result<(), NetError> {
        let player_id = self.player_id;
        self.notices.unregister(player_id).await;
        self.input_tx
            .send(GameEvent::Leave { player_id })
            .await
            .map_err(|_| NetError::InputClosed)?;

        debug!(
            player_id,
            msgs_in = self.msgs_in,
            msgs_out = self.msgs_out,
            bytes_in = self.bytes_in,
            bytes_out = self.bytes_out,
            invalid_json = self.invalid_json,
            lagged = self.lagged,
            lag_recoveries = self.lag_recovery_count,
            "connection stats"
        );
        info!(player_id, "client disconnected");
        Ok(())
    }
}
