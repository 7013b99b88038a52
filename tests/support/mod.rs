// Shared helpers for booting a server and talking to it over WebSocket.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::{path::PathBuf, time::Duration};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Upper bound for any single wait on the server.
pub const WAIT: Duration = Duration::from_secs(10);

// Start a fresh server on an ephemeral port and return its `host:port`.
//
// Each test gets its own server so session resets in one test can't leak into another.
pub async fn spawn_server() -> String {
    // Bind before spawning so connections queue up even if the task hasn't started yet.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public");

    tokio::spawn(async move {
        arena_server::frameworks::server::run_with_static_dir(listener, static_dir)
            .await
            .expect("server failed");
    });

    addr.to_string()
}

pub async fn connect(addr: &str) -> Ws {
    let (ws, _response) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket handshake");
    ws
}

// Next JSON text frame, skipping control frames. `None` once the server closed the socket.
pub async fn next_json(ws: &mut Ws) -> Option<Value> {
    loop {
        let msg = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("timed out waiting for a server message")?;
        match msg {
            Ok(Message::Text(text)) => {
                return Some(serde_json::from_str(&text).expect("server sent invalid JSON"));
            }
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

// Next message of the given `type` matching `pred`.
pub async fn next_of_type<F>(ws: &mut Ws, ty: &str, mut pred: F) -> Value
where
    F: FnMut(&Value) -> bool,
{
    let search = async {
        loop {
            let msg = next_json(ws).await.expect("socket closed early");
            if msg["type"] == ty && pred(&msg) {
                return msg;
            }
        }
    };
    tokio::time::timeout(WAIT, search)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {ty}"))
}

// Connect and consume the identity frame, returning the assigned player id.
pub async fn join(addr: &str) -> (Ws, String) {
    let mut ws = connect(addr).await;
    let identity = next_of_type(&mut ws, "identity", |_| true).await;
    let id = identity["data"]["player_id"]
        .as_str()
        .expect("identity carries a string id")
        .to_string();
    (ws, id)
}

pub async fn send_intent(ws: &mut Ws, ty: &str, dx: f64, dy: f64) {
    let payload = json!({ "type": ty, "data": { "dx": dx, "dy": dy } });
    ws.send(Message::Text(payload.to_string().into()))
        .await
        .expect("send intent");
}

// Player entry from an `updatePlayers` frame, if present.
pub fn player<'a>(msg: &'a Value, id: &str) -> Option<&'a Value> {
    msg["data"].get(id)
}
