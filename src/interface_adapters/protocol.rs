// Wire protocol DTOs and conversions for public game server messages.

use crate::domain::{PlayerId, PlayerInput, PlayerSnapshot, ProjectileSnapshot, SafeZone};
use crate::use_cases::WorldUpdate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    // Assigned identity for the connection, sent once after the upgrade.
    Identity { player_id: String },
    // Every living player keyed by id.
    UpdatePlayers(BTreeMap<String, PlayerDto>),
    // Every live projectile in creation order.
    UpdateBullets(Vec<BulletDto>),
    UpdateSafeZone(SafeZoneDto),
    // Sent only to the eliminated connection.
    PlayerEliminated,
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Move(DirectionDto),
    Shoot(DirectionDto),
}

/// Direction payload shared by move and shoot intents.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DirectionDto {
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
}

impl From<ClientMessage> for PlayerInput {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Move(DirectionDto { dx, dy }) => PlayerInput::Move { dx, dy },
            ClientMessage::Shoot(DirectionDto { dx, dy }) => PlayerInput::Shoot { dx, dy },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub id: String,
}

impl From<&PlayerSnapshot> for PlayerDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            x: p.x,
            y: p.y,
            health: p.health,
            id: p.id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletDto {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub owner: String,
}

impl From<&ProjectileSnapshot> for BulletDto {
    fn from(p: &ProjectileSnapshot) -> Self {
        Self {
            x: p.x,
            y: p.y,
            dx: p.dx,
            dy: p.dy,
            owner: p.owner.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SafeZoneDto {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<SafeZone> for SafeZoneDto {
    fn from(zone: SafeZone) -> Self {
        Self {
            x: zone.x,
            y: zone.y,
            radius: zone.radius,
        }
    }
}

impl ServerMessage {
    pub fn identity(player_id: PlayerId) -> Self {
        ServerMessage::Identity {
            player_id: player_id.to_string(),
        }
    }
}

impl From<&WorldUpdate> for ServerMessage {
    fn from(update: &WorldUpdate) -> Self {
        match update {
            WorldUpdate::Players(players) => ServerMessage::UpdatePlayers(
                players
                    .iter()
                    .map(|p| (p.id.to_string(), PlayerDto::from(p)))
                    .collect(),
            ),
            WorldUpdate::Projectiles(projectiles) => {
                ServerMessage::UpdateBullets(projectiles.iter().map(BulletDto::from).collect())
            }
            WorldUpdate::SafeZone(zone) => ServerMessage::UpdateSafeZone((*zone).into()),
            WorldUpdate::Eliminated => ServerMessage::PlayerEliminated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn to_value(msg: &ServerMessage) -> Value {
        serde_json::to_value(msg).expect("serialize")
    }

    #[test]
    fn players_update_is_keyed_by_string_id() {
        let update = WorldUpdate::Players(vec![PlayerSnapshot {
            id: 12,
            x: 150.0,
            y: 250.0,
            health: 75.0,
        }]);

        let value = to_value(&ServerMessage::from(&update));

        assert_eq!(
            value,
            json!({
                "type": "updatePlayers",
                "data": { "12": { "x": 150.0, "y": 250.0, "health": 75.0, "id": "12" } }
            })
        );
    }

    #[test]
    fn elimination_has_no_payload() {
        let value = to_value(&ServerMessage::from(&WorldUpdate::Eliminated));
        assert_eq!(value, json!({ "type": "playerEliminated" }));
    }

    #[test]
    fn zone_and_bullets_use_client_field_names() {
        let zone = to_value(&ServerMessage::from(&WorldUpdate::SafeZone(SafeZone {
            x: 400.0,
            y: 300.0,
            radius: 250.0,
        })));
        assert_eq!(
            zone,
            json!({ "type": "updateSafeZone", "data": { "x": 400.0, "y": 300.0, "radius": 250.0 } })
        );

        let bullets = to_value(&ServerMessage::from(&WorldUpdate::Projectiles(vec![
            ProjectileSnapshot {
                x: 1.0,
                y: 2.0,
                dx: 1.0,
                dy: 0.0,
                owner: 3,
            },
        ])));
        assert_eq!(bullets["type"], "updateBullets");
        assert_eq!(bullets["data"][0]["owner"], "3");
    }

    #[test]
    fn client_intents_parse_without_validation() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"move","data":{"dx":5,"dy":-1}}"#).expect("parse");
        assert_eq!(
            PlayerInput::from(msg),
            PlayerInput::Move { dx: 5.0, dy: -1.0 }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"shoot","data":{"dx":0.6,"dy":0.8}}"#).expect("parse");
        assert_eq!(
            PlayerInput::from(msg),
            PlayerInput::Shoot { dx: 0.6, dy: 0.8 }
        );

        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"jump","data":{}}"#).is_err());
    }

    #[test]
    fn identity_uses_snake_case_field() {
        let value = to_value(&ServerMessage::identity(5));
        assert_eq!(
            value,
            json!({ "type": "identity", "data": { "player_id": "5" } })
        );
    }
}
