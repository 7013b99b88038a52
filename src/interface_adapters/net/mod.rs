// Network adapter for client WebSocket connections.

pub mod client;

pub use client::{spawn_update_serializer, ws_handler};
