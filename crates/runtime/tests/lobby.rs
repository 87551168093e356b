//! Session orchestrator: matchmaking, private rooms, relay and disconnects.

use std::time::Duration;

use game_core::{Action, GameConfig, Phase, Seat};
use runtime::{
    BotProvider, ClientMessage, ClientMirror, ConnectionId, Lobby, LobbyConfig, LobbyHandle,
    LobbyStats, RoomCode, ServerMessage,
};
use tokio::sync::mpsc;
use tokio::time::timeout;

struct Client {
    id: ConnectionId,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Client {
    async fn connect(lobby: &LobbyHandle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = lobby.connect(tx).await.unwrap();
        Self { id, rx }
    }

    async fn recv(&mut self) -> ServerMessage {
        timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for a server message")
            .expect("outbound channel closed")
    }

    /// Next message with the given event name; anything else is skipped.
    async fn expect(&mut self, event: &str) -> ServerMessage {
        loop {
            let message = self.recv().await;
            if message.event_name() == event {
                return message;
            }
        }
    }

    async fn send(&self, lobby: &LobbyHandle, message: ClientMessage) {
        lobby.handle_message(self.id, message).await.unwrap();
    }
}

fn seeded() -> LobbyConfig {
    LobbyConfig {
        seed: Some(7),
        ..LobbyConfig::default()
    }
}

async fn stats(lobby: &LobbyHandle) -> LobbyStats {
    lobby.stats().await.unwrap()
}

/// Four queued clients; returns them in seat order with the room code.
async fn matched(lobby: &LobbyHandle) -> (Vec<Client>, RoomCode) {
    let mut clients = Vec::new();
    for _ in 0..4 {
        let client = Client::connect(lobby).await;
        client
            .send(lobby, ClientMessage::JoinMatchmaking { username: None })
            .await;
        clients.push(client);
    }

    let mut code = None;
    for (client, seat) in clients.iter_mut().zip(Seat::ALL) {
        match client.expect("match_found").await {
            ServerMessage::MatchFound {
                room_code,
                role,
                players,
            } => {
                assert_eq!(role, seat);
                assert_eq!(players.len(), 4);
                code = Some(room_code);
            }
            _ => unreachable!(),
        }
    }
    (clients, code.unwrap())
}

#[tokio::test]
async fn matchmaking_groups_four_in_arrival_order() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut first = Client::connect(&handle).await;
    first
        .send(&handle, ClientMessage::JoinMatchmaking { username: Some("ana".into()) })
        .await;
    assert_eq!(
        first.expect("queue_update").await,
        ServerMessage::queue_update(1)
    );
    assert_eq!(stats(&handle).await.queued, 1);

    let mut rest = Vec::new();
    for _ in 0..3 {
        let client = Client::connect(&handle).await;
        client
            .send(&handle, ClientMessage::JoinMatchmaking { username: None })
            .await;
        rest.push(client);
    }

    let ServerMessage::MatchFound { role, players, .. } = first.expect("match_found").await
    else {
        unreachable!()
    };
    assert_eq!(role, Seat::P1);
    let names: Vec<_> = players.iter().map(|p| p.username.as_str()).collect();
    assert_eq!(names, ["ana", "Player2", "Player3", "Player4"]);
    assert_eq!(
        players.iter().map(|p| p.role).collect::<Vec<_>>(),
        Seat::ALL.to_vec()
    );

    // The canonical opening state follows the match.
    let ServerMessage::StateUpdate { state } = first.expect("state_update").await else {
        unreachable!()
    };
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.nonce, 0);

    let stats = stats(&handle).await;
    assert_eq!(stats.queued, 0);
    assert_eq!(stats.rooms, 1);
    assert_eq!(stats.connected, 4);

    lobby.shutdown().await.unwrap();
}

#[tokio::test]
async fn private_room_fills_and_starts() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut host = Client::connect(&handle).await;
    host.send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    let ServerMessage::RoomCreated { room_code, players } = host.expect("room_created").await
    else {
        unreachable!()
    };
    assert_eq!(room_code.as_str().len(), 6);
    assert_eq!(players[0].username, "Host");
    assert_eq!(players[0].role, Seat::P1);

    let mut guests = Vec::new();
    for _ in 0..3 {
        let guest = Client::connect(&handle).await;
        guest
            .send(
                &handle,
                ClientMessage::JoinPrivateRoom {
                    room_code: RoomCode::new(room_code.as_str().to_lowercase()),
                    username: None,
                },
            )
            .await;
        guests.push(guest);
    }

    let ServerMessage::LobbyUpdate { players } = guests[0].expect("lobby_update").await else {
        unreachable!()
    };
    assert_eq!(players.len(), 2);
    assert_eq!(players[1].username, "Guest2");
    assert_eq!(players[1].role, Seat::P2);

    for (guest, seat) in guests.iter_mut().zip([Seat::P2, Seat::P3, Seat::P4]) {
        let ServerMessage::GameStart { role, players } = guest.expect("game_start").await else {
            unreachable!()
        };
        assert_eq!(role, seat);
        assert_eq!(players.len(), 4);
    }
    let ServerMessage::GameStart { role, .. } = host.expect("game_start").await else {
        unreachable!()
    };
    assert_eq!(role, Seat::P1);

    // A fifth joiner is turned away.
    let mut late = Client::connect(&handle).await;
    late.send(
        &handle,
        ClientMessage::JoinPrivateRoom {
            room_code: room_code.clone(),
            username: None,
        },
    )
    .await;
    assert_eq!(
        late.expect("error_message").await,
        ServerMessage::error("Room is full")
    );
}

#[tokio::test]
async fn unknown_room_is_reported() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut client = Client::connect(&handle).await;
    client
        .send(
            &handle,
            ClientMessage::JoinPrivateRoom {
                room_code: RoomCode::new("NOPE00"),
                username: None,
            },
        )
        .await;
    assert_eq!(
        client.expect("error_message").await,
        ServerMessage::error("Room not found")
    );
}

#[tokio::test]
async fn actions_are_relayed_and_state_is_broadcast() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();
    let (mut clients, code) = matched(&handle).await;
    for client in clients.iter_mut() {
        client.expect("state_update").await;
    }

    // p2 may not act for p1, nor out of turn.
    clients[1]
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code: code.clone(),
                action: Action::roll(Seat::P1),
            },
        )
        .await;
    assert!(matches!(
        clients[1].expect("error_message").await,
        ServerMessage::ErrorMessage { .. }
    ));
    clients[1]
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code: code.clone(),
                action: Action::roll(Seat::P2),
            },
        )
        .await;
    assert!(matches!(
        clients[1].expect("error_message").await,
        ServerMessage::ErrorMessage { .. }
    ));

    clients[0]
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code: code.clone(),
                action: Action::roll(Seat::P1),
            },
        )
        .await;

    let ServerMessage::StateUpdate { state: canonical } = clients[0].expect("state_update").await
    else {
        unreachable!()
    };
    assert_eq!(canonical.nonce, 1);

    for client in &mut clients[1..] {
        let ServerMessage::SyncAction(action) = client.expect("sync_action").await else {
            unreachable!()
        };
        assert!(action.is_resolved());
        assert_eq!(action.seat, Seat::P1);

        let ServerMessage::StateUpdate { state } = client.expect("state_update").await else {
            unreachable!()
        };
        assert_eq!(state, canonical);
    }
}

#[tokio::test]
async fn game_actions_need_a_started_room() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut host = Client::connect(&handle).await;
    host.send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    let ServerMessage::RoomCreated { room_code, .. } = host.expect("room_created").await else {
        unreachable!()
    };

    host.send(
        &handle,
        ClientMessage::GameAction {
            room_code: room_code.clone(),
            action: Action::roll(Seat::P1),
        },
    )
    .await;
    assert!(matches!(
        host.expect("error_message").await,
        ServerMessage::ErrorMessage { .. }
    ));

    let mut stranger = Client::connect(&handle).await;
    stranger
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code,
                action: Action::roll(Seat::P1),
            },
        )
        .await;
    assert!(matches!(
        stranger.expect("error_message").await,
        ServerMessage::ErrorMessage { .. }
    ));

    // Already seated: a second room is refused.
    host.send(&handle, ClientMessage::JoinMatchmaking { username: None })
        .await;
    assert!(matches!(
        host.expect("error_message").await,
        ServerMessage::ErrorMessage { .. }
    ));
}

#[tokio::test]
async fn disconnects_update_queue_room_and_presence() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut a = Client::connect(&handle).await;
    let b = Client::connect(&handle).await;
    assert_eq!(a.recv().await, ServerMessage::ActivePlayersCount(1));
    assert_eq!(a.recv().await, ServerMessage::ActivePlayersCount(2));

    a.send(&handle, ClientMessage::JoinMatchmaking { username: None })
        .await;
    b.send(&handle, ClientMessage::JoinMatchmaking { username: None })
        .await;
    assert_eq!(a.expect("queue_update").await, ServerMessage::queue_update(1));
    assert_eq!(a.expect("queue_update").await, ServerMessage::queue_update(2));

    handle.disconnect(b.id).await.unwrap();
    assert_eq!(a.expect("queue_update").await, ServerMessage::queue_update(1));
    assert_eq!(a.recv().await, ServerMessage::ActivePlayersCount(1));
    assert_eq!(stats(&handle).await.queued, 1);

    // Private room: remaining members are told, the empty room is deleted.
    let mut host = Client::connect(&handle).await;
    host.send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    let ServerMessage::RoomCreated { room_code, .. } = host.expect("room_created").await else {
        unreachable!()
    };
    let guest = Client::connect(&handle).await;
    guest
        .send(
            &handle,
            ClientMessage::JoinPrivateRoom {
                room_code: room_code.clone(),
                username: Some("bo".into()),
            },
        )
        .await;
    host.expect("lobby_update").await;

    handle.disconnect(guest.id).await.unwrap();
    assert_eq!(host.expect("player_left").await, ServerMessage::player_left());
    let ServerMessage::LobbyUpdate { players } = host.expect("lobby_update").await else {
        unreachable!()
    };
    assert_eq!(players.len(), 1);
    assert_eq!(stats(&handle).await.rooms, 1);

    handle.disconnect(host.id).await.unwrap();
    assert_eq!(stats(&handle).await.rooms, 0);
}

#[tokio::test]
async fn disconnect_mid_game_notifies_the_rest_and_play_goes_on() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();
    let (mut clients, code) = matched(&handle).await;
    for client in clients.iter_mut() {
        client.expect("state_update").await;
    }

    let departed = clients.pop().unwrap();
    handle.disconnect(departed.id).await.unwrap();
    for client in clients.iter_mut() {
        assert_eq!(client.expect("player_left").await, ServerMessage::player_left());
        let ServerMessage::LobbyUpdate { players } = client.recv().await else {
            panic!("roster must follow the departure notice");
        };
        let roles: Vec<_> = players.iter().map(|p| p.role).collect();
        assert_eq!(roles, [Seat::P1, Seat::P2, Seat::P3]);
    }

    // The room no longer counts the departed seat as a member.
    clients[1]
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code: code.clone(),
                action: Action::roll(Seat::P4),
            },
        )
        .await;
    assert_eq!(
        clients[1].expect("error_message").await,
        ServerMessage::error("Seat p4 is not yours (you play p2)")
    );

    // The current seat still plays and everyone left is kept in sync.
    clients[0]
        .send(
            &handle,
            ClientMessage::GameAction {
                room_code: code.clone(),
                action: Action::roll(Seat::P1),
            },
        )
        .await;
    let ServerMessage::StateUpdate { state: canonical } = clients[0].expect("state_update").await
    else {
        unreachable!()
    };
    assert_eq!(canonical.nonce, 1);
    for client in &mut clients[1..] {
        assert!(matches!(
            client.expect("sync_action").await,
            ServerMessage::SyncAction(action) if action.seat == Seat::P1
        ));
        let ServerMessage::StateUpdate { state } = client.expect("state_update").await else {
            unreachable!()
        };
        assert_eq!(state, canonical);
    }

    let stats = stats(&handle).await;
    assert_eq!(stats.rooms, 1);
    assert_eq!(stats.connected, 3);
}

#[tokio::test]
async fn survivors_of_an_abandoned_game_can_queue_again() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();
    let (mut clients, _code) = matched(&handle).await;

    let mut survivor = clients.remove(0);
    for client in &clients {
        handle.disconnect(client.id).await.unwrap();
    }

    survivor
        .send(&handle, ClientMessage::JoinMatchmaking { username: None })
        .await;
    assert_eq!(
        survivor.expect("queue_update").await,
        ServerMessage::queue_update(1)
    );
    assert_eq!(
        stats(&handle).await,
        LobbyStats {
            queued: 1,
            rooms: 0,
            connected: 1,
        }
    );
}

#[tokio::test]
async fn a_live_game_keeps_its_players() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();
    let (mut clients, _code) = matched(&handle).await;

    clients[2]
        .send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    assert_eq!(
        clients[2].expect("error_message").await,
        ServerMessage::error("Already in a room or queue")
    );
    assert_eq!(stats(&handle).await.rooms, 1);
}

#[tokio::test]
async fn rejoining_a_vacated_seat_takes_the_lowest_free_role() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();

    let mut host = Client::connect(&handle).await;
    host.send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    let ServerMessage::RoomCreated { room_code, .. } = host.expect("room_created").await else {
        unreachable!()
    };

    let join = |code: RoomCode| ClientMessage::JoinPrivateRoom {
        room_code: code,
        username: None,
    };
    let second = Client::connect(&handle).await;
    second.send(&handle, join(room_code.clone())).await;
    let third = Client::connect(&handle).await;
    third.send(&handle, join(room_code.clone())).await;
    handle.disconnect(second.id).await.unwrap();

    let mut fourth = Client::connect(&handle).await;
    fourth.send(&handle, join(room_code)).await;
    let ServerMessage::LobbyUpdate { players } = fourth.expect("lobby_update").await else {
        unreachable!()
    };
    let roles: Vec<_> = players.iter().map(|p| p.role).collect();
    assert_eq!(roles, [Seat::P1, Seat::P2, Seat::P3]);
    assert_eq!(players[1].id, fourth.id);
}

#[tokio::test]
async fn networked_bots_finish_with_converged_mirrors() {
    let lobby = Lobby::start(seeded());
    let handle = lobby.handle();
    let (mut clients, code) = matched(&handle).await;

    let mut mirrors = Vec::new();
    for (client, seat) in clients.iter_mut().zip(Seat::ALL) {
        let mut mirror = ClientMirror::new(GameConfig::default());
        mirror.apply_server_message(&ServerMessage::GameStart {
            role: seat,
            players: Vec::new(),
        });
        mirror.apply_server_message(&client.expect("state_update").await);
        assert_eq!(mirror.seat(), Some(seat));
        mirrors.push(mirror);
    }

    for _ in 0..20_000 {
        let state = mirrors[0].state().clone();
        if state.is_over() {
            break;
        }
        let actor = state.current_seat.index();
        let action = BotProvider::decide(state.current_seat, &state);
        clients[actor]
            .send(
                &handle,
                ClientMessage::GameAction {
                    room_code: code.clone(),
                    action,
                },
            )
            .await;

        for (index, (client, mirror)) in clients.iter_mut().zip(&mut mirrors).enumerate() {
            if index != actor {
                let relayed = client.expect("sync_action").await;
                mirror.apply_server_message(&relayed);
            }
            let ServerMessage::StateUpdate { state } = client.expect("state_update").await else {
                unreachable!()
            };
            if index != actor {
                // Replaying the relayed action reproduces the canonical state.
                assert_eq!(mirror.state(), state.as_ref());
            }
            mirror.replace(*state);
        }
    }

    let final_state = mirrors[0].state();
    assert!(final_state.is_over());
    assert!(final_state.winner().is_some());
    assert!(mirrors.iter().all(|m| m.state() == final_state));

    // A finished room does not hold its players: one queues again, another
    // opens a private room, and the rest are told who left.
    clients[0]
        .send(&handle, ClientMessage::JoinMatchmaking { username: None })
        .await;
    assert_eq!(
        clients[0].expect("queue_update").await,
        ServerMessage::queue_update(1)
    );
    clients[1]
        .send(&handle, ClientMessage::CreatePrivateRoom { username: None })
        .await;
    clients[1].expect("room_created").await;
    assert_eq!(clients[3].expect("player_left").await, ServerMessage::player_left());

    assert_eq!(
        stats(&handle).await,
        LobbyStats {
            queued: 1,
            rooms: 2,
            connected: 4,
        }
    );
}
