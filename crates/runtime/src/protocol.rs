//! Wire messages exchanged between clients and the session orchestrator.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}` with
//! snake_case event names and camelCase payload fields.

use std::fmt;

use game_core::{Action, GameState, Seat};
use serde::{Deserialize, Serialize};

use crate::lobby::{LobbyConfig, RoomCode};

/// Server-assigned identity of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One seat of a room roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub username: String,
    pub role: Seat,
}

/// Client → orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    JoinMatchmaking {
        #[serde(default)]
        username: Option<String>,
    },
    CreatePrivateRoom {
        #[serde(default)]
        username: Option<String>,
    },
    JoinPrivateRoom {
        room_code: RoomCode,
        #[serde(default)]
        username: Option<String>,
    },
    GameAction {
        room_code: RoomCode,
        action: Action,
    },
}

impl ClientMessage {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Orchestrator → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    QueueUpdate {
        count: usize,
        required: usize,
    },
    MatchFound {
        room_code: RoomCode,
        role: Seat,
        players: Vec<PlayerInfo>,
    },
    RoomCreated {
        room_code: RoomCode,
        players: Vec<PlayerInfo>,
    },
    LobbyUpdate {
        players: Vec<PlayerInfo>,
    },
    GameStart {
        role: Seat,
        players: Vec<PlayerInfo>,
    },
    PlayerLeft {
        message: String,
    },
    ErrorMessage {
        message: String,
    },
    ActivePlayersCount(usize),
    /// A peer's action, resolved by the room; replay it locally.
    SyncAction(Action),
    /// Canonical state after every accepted action.
    StateUpdate {
        state: Box<GameState>,
    },
}

impl ServerMessage {
    pub fn queue_update(count: usize) -> Self {
        ServerMessage::QueueUpdate {
            count,
            required: LobbyConfig::ROOM_SIZE,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::ErrorMessage {
            message: message.into(),
        }
    }

    pub fn player_left() -> Self {
        ServerMessage::PlayerLeft {
            message: "A player disconnected.".to_owned(),
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::QueueUpdate { .. } => "queue_update",
            ServerMessage::MatchFound { .. } => "match_found",
            ServerMessage::RoomCreated { .. } => "room_created",
            ServerMessage::LobbyUpdate { .. } => "lobby_update",
            ServerMessage::GameStart { .. } => "game_start",
            ServerMessage::PlayerLeft { .. } => "player_left",
            ServerMessage::ErrorMessage { .. } => "error_message",
            ServerMessage::ActivePlayersCount(_) => "active_players_count",
            ServerMessage::SyncAction(_) => "sync_action",
            ServerMessage::StateUpdate { .. } => "state_update",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_messages_use_event_and_data() {
        let msg = ClientMessage::from_json(
            r#"{"event":"join_private_room","data":{"roomCode":"K3X9QZ","username":"ana"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinPrivateRoom {
                room_code: RoomCode::new("K3X9QZ"),
                username: Some("ana".into()),
            }
        );
    }

    #[test]
    fn username_is_optional() {
        let msg = ClientMessage::from_json(r#"{"event":"join_matchmaking","data":{}}"#).unwrap();
        assert_eq!(msg, ClientMessage::JoinMatchmaking { username: None });
    }

    #[test]
    fn game_action_carries_a_rule_action() {
        let msg = ClientMessage::from_json(
            r#"{"event":"game_action","data":{"roomCode":"AB12CD","action":{"seat":"p2","kind":{"move":{"piece":3,"value":4}}}}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::GameAction {
                room_code: RoomCode::new("AB12CD"),
                action: Action::apply_move(Seat::P2, 3, 4),
            }
        );
    }

    #[test]
    fn server_messages_match_the_wire_shape() {
        let players = vec![PlayerInfo {
            id: ConnectionId(4),
            username: "Host".into(),
            role: Seat::P1,
        }];
        let created = ServerMessage::RoomCreated {
            room_code: RoomCode::new("QWERTY"),
            players,
        };
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({
                "event": "room_created",
                "data": {
                    "roomCode": "QWERTY",
                    "players": [{"id": 4, "username": "Host", "role": "p1"}]
                }
            })
        );

        assert_eq!(
            serde_json::to_value(ServerMessage::ActivePlayersCount(3)).unwrap(),
            json!({"event": "active_players_count", "data": 3})
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::queue_update(2)).unwrap(),
            json!({"event": "queue_update", "data": {"count": 2, "required": 4}})
        );
    }

    #[test]
    fn unknown_events_are_rejected() {
        assert!(ClientMessage::from_json(r#"{"event":"cheat","data":{}}"#).is_err());
    }

    #[test]
    fn event_names_match_serialized_tags() {
        let msg = ServerMessage::player_left();
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["event"], msg.event_name());
        assert_eq!(value["data"]["message"], "A player disconnected.");
    }
}
