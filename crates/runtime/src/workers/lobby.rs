//! Lobby actor: connections, matchmaking queue and room registry.
//!
//! Every request is handled to completion before the next one is read, so a
//! fourth join is always processed before any action for that room and a
//! disconnect before any later action that referenced the departed seat.
//!
//! Room actors report a finished game back through the same channel. A
//! connection whose room is finished, or has lost a seat mid-game, may join
//! again; it leaves the old room first.

use std::collections::{HashMap, VecDeque};

use game_core::{Action, Seat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use super::room::{RoomCommand, RoomMember, RoomWorker};
use crate::api::{Result, RuntimeError};
use crate::lobby::{LobbyConfig, LobbyStats, RoomCode};
use crate::protocol::{ClientMessage, ConnectionId, PlayerInfo, ServerMessage};

/// Commands that can be sent to the lobby worker.
pub enum LobbyCommand {
    Connect {
        outbound: mpsc::UnboundedSender<ServerMessage>,
        reply: oneshot::Sender<ConnectionId>,
    },
    Disconnect {
        id: ConnectionId,
    },
    Message {
        id: ConnectionId,
        message: ClientMessage,
    },
    Stats {
        reply: oneshot::Sender<LobbyStats>,
    },
    /// Sent by a room actor once its game has a winner.
    RoomFinished {
        code: RoomCode,
    },
    Shutdown,
}

struct Connection {
    outbound: mpsc::UnboundedSender<ServerMessage>,
    room: Option<RoomCode>,
    queued: bool,
}

struct Room {
    private: bool,
    players: Vec<PlayerInfo>,
    /// Present once the game has started.
    worker: Option<mpsc::Sender<RoomCommand>>,
    finished: bool,
}

impl Room {
    fn is_member(&self, id: ConnectionId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// The game ended, or a seat left after it started and can never be
    /// filled again.
    fn is_over(&self) -> bool {
        self.finished || (self.worker.is_some() && self.players.len() < LobbyConfig::ROOM_SIZE)
    }

    /// Lowest seat nobody holds.
    fn free_seat(&self) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|&seat| self.players.iter().all(|p| p.role != seat))
    }
}

pub struct LobbyWorker {
    config: LobbyConfig,
    command_rx: mpsc::Receiver<LobbyCommand>,
    /// Handed to room actors; weak so the lobby still stops once every
    /// handle is gone.
    command_tx: mpsc::WeakSender<LobbyCommand>,
    connections: HashMap<ConnectionId, Connection>,
    queue: VecDeque<(ConnectionId, Option<String>)>,
    rooms: HashMap<RoomCode, Room>,
    next_id: u64,
    rng: StdRng,
}

impl LobbyWorker {
    pub fn new(
        config: LobbyConfig,
        command_tx: mpsc::WeakSender<LobbyCommand>,
        command_rx: mpsc::Receiver<LobbyCommand>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            command_rx,
            command_tx,
            connections: HashMap::new(),
            queue: VecDeque::new(),
            rooms: HashMap::new(),
            next_id: 1,
            rng,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if !self.handle_command(cmd) {
                break;
            }
        }
        info!(target: "runtime::lobby", "lobby stopped");
    }

    fn handle_command(&mut self, cmd: LobbyCommand) -> bool {
        match cmd {
            LobbyCommand::Connect { outbound, reply } => {
                let id = self.connect(outbound);
                if reply.send(id).is_err() {
                    debug!(target: "runtime::lobby", "Connect reply channel closed (caller dropped)");
                }
            }
            LobbyCommand::Disconnect { id } => self.disconnect(id),
            LobbyCommand::Message { id, message } => {
                if let Err(error) = self.handle_message(id, message) {
                    if error.is_client_error() {
                        debug!(target: "runtime::lobby", conn = %id, error = %error, "request rejected");
                    } else {
                        warn!(target: "runtime::lobby", conn = %id, error = %error, "request failed");
                    }
                    self.send(id, ServerMessage::error(error.to_string()));
                }
            }
            LobbyCommand::Stats { reply } => {
                if reply.send(self.stats()).is_err() {
                    debug!(target: "runtime::lobby", "Stats reply channel closed (caller dropped)");
                }
            }
            LobbyCommand::RoomFinished { code } => {
                if let Some(room) = self.rooms.get_mut(&code) {
                    room.finished = true;
                    debug!(target: "runtime::lobby", room = %code, "room finished");
                }
            }
            LobbyCommand::Shutdown => return false,
        }
        true
    }

    fn connect(&mut self, outbound: mpsc::UnboundedSender<ServerMessage>) -> ConnectionId {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.connections.insert(
            id,
            Connection {
                outbound,
                room: None,
                queued: false,
            },
        );
        info!(target: "runtime::lobby", conn = %id, connected = self.connections.len(), "connected");
        self.broadcast_active_count();
        id
    }

    fn disconnect(&mut self, id: ConnectionId) {
        let Some(connection) = self.connections.remove(&id) else {
            return;
        };
        info!(target: "runtime::lobby", conn = %id, connected = self.connections.len(), "disconnected");

        if connection.queued {
            self.queue.retain(|(queued, _)| *queued != id);
            self.broadcast_queue();
        }

        if let Some(code) = connection.room {
            self.leave_room(id, code);
        }

        self.broadcast_active_count();
    }

    fn leave_room(&mut self, id: ConnectionId, code: RoomCode) {
        let Some(room) = self.rooms.get_mut(&code) else {
            return;
        };
        room.players.retain(|p| p.id != id);

        if let Some(worker) = &room.worker {
            match worker.try_send(RoomCommand::Leave { id }) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!(target: "runtime::room", room = %code, conn = %id, "room queue full, leave not delivered");
                }
                Err(TrySendError::Closed(_)) => {
                    error!(target: "runtime::room", room = %code, "room worker stopped unexpectedly");
                }
            }
        }

        if room.players.is_empty() {
            self.rooms.remove(&code);
            info!(target: "runtime::lobby", room = %code, "room closed");
            return;
        }

        let players = room.players.clone();
        let ids: Vec<_> = players.iter().map(|p| p.id).collect();
        for member in ids {
            self.send(member, ServerMessage::player_left());
            self.send(member, ServerMessage::LobbyUpdate {
                players: players.clone(),
            });
        }
    }

    fn handle_message(&mut self, id: ConnectionId, message: ClientMessage) -> Result<()> {
        if !self.connections.contains_key(&id) {
            return Err(RuntimeError::UnknownConnection(id));
        }

        match message {
            ClientMessage::GameAction { room_code, action } => {
                self.relay_action(id, room_code, action)
            }
            ClientMessage::JoinMatchmaking { username } => {
                self.vacate(id)?;
                self.enqueue(id, username);
                Ok(())
            }
            ClientMessage::CreatePrivateRoom { username } => {
                self.vacate(id)?;
                self.create_private_room(id, username);
                Ok(())
            }
            ClientMessage::JoinPrivateRoom {
                room_code,
                username,
            } => {
                self.vacate(id)?;
                self.join_private_room(id, room_code, username)
            }
        }
    }

    /// Makes a connection free to join again. Being queued or seated in a
    /// live room is an error; a room that is over is left first.
    fn vacate(&mut self, id: ConnectionId) -> Result<()> {
        let connection = self
            .connections
            .get(&id)
            .ok_or(RuntimeError::UnknownConnection(id))?;
        if connection.queued {
            return Err(RuntimeError::AlreadySeated);
        }
        let Some(code) = connection.room.clone() else {
            return Ok(());
        };
        if self.rooms.get(&code).is_some_and(|room| !room.is_over()) {
            return Err(RuntimeError::AlreadySeated);
        }

        debug!(target: "runtime::lobby", room = %code, conn = %id, "leaving finished room");
        self.leave_room(id, code);
        if let Some(connection) = self.connections.get_mut(&id) {
            connection.room = None;
        }
        Ok(())
    }

    fn enqueue(&mut self, id: ConnectionId, username: Option<String>) {
        self.queue.push_back((id, username));
        if let Some(connection) = self.connections.get_mut(&id) {
            connection.queued = true;
        }
        debug!(target: "runtime::lobby", conn = %id, queued = self.queue.len(), "joined matchmaking");

        if self.queue.len() < LobbyConfig::ROOM_SIZE {
            self.broadcast_queue();
            return;
        }

        let code = self.fresh_code();
        let players: Vec<PlayerInfo> = self
            .queue
            .drain(..LobbyConfig::ROOM_SIZE)
            .zip(Seat::ALL)
            .map(|((id, username), role)| PlayerInfo {
                id,
                username: username_or(username, || format!("Player{}", role.index() + 1)),
                role,
            })
            .collect();

        for player in &players {
            if let Some(connection) = self.connections.get_mut(&player.id) {
                connection.queued = false;
                connection.room = Some(code.clone());
            }
            self.send(player.id, ServerMessage::MatchFound {
                room_code: code.clone(),
                role: player.role,
                players: players.clone(),
            });
        }
        info!(target: "runtime::lobby", room = %code, "match created");

        self.rooms.insert(
            code.clone(),
            Room {
                private: false,
                players,
                worker: None,
                finished: false,
            },
        );
        self.start_game(&code);
    }

    fn create_private_room(&mut self, id: ConnectionId, username: Option<String>) {
        let code = self.fresh_code();
        let players = vec![PlayerInfo {
            id,
            username: username_or(username, || "Host".to_owned()),
            role: Seat::P1,
        }];

        if let Some(connection) = self.connections.get_mut(&id) {
            connection.room = Some(code.clone());
        }
        self.send(id, ServerMessage::RoomCreated {
            room_code: code.clone(),
            players: players.clone(),
        });
        info!(target: "runtime::lobby", room = %code, conn = %id, "private room created");

        self.rooms.insert(
            code,
            Room {
                private: true,
                players,
                worker: None,
                finished: false,
            },
        );
    }

    fn join_private_room(
        &mut self,
        id: ConnectionId,
        code: RoomCode,
        username: Option<String>,
    ) -> Result<()> {
        let room = self
            .rooms
            .get_mut(&code)
            .ok_or_else(|| RuntimeError::RoomNotFound { code: code.clone() })?;
        let role = match room.free_seat() {
            Some(role) if room.worker.is_none() => role,
            _ => return Err(RuntimeError::RoomFull { code }),
        };

        room.players.push(PlayerInfo {
            id,
            username: username_or(username, || format!("Guest{}", role.index() + 1)),
            role,
        });
        room.players.sort_by_key(|p| p.role);
        let players = room.players.clone();
        let private = room.private;

        if let Some(connection) = self.connections.get_mut(&id) {
            connection.room = Some(code.clone());
        }
        debug!(target: "runtime::lobby", room = %code, conn = %id, seat = %role, private, "joined room");

        for player in &players {
            self.send(player.id, ServerMessage::LobbyUpdate {
                players: players.clone(),
            });
        }

        if players.len() == LobbyConfig::ROOM_SIZE {
            for player in &players {
                self.send(player.id, ServerMessage::GameStart {
                    role: player.role,
                    players: players.clone(),
                });
            }
            info!(target: "runtime::lobby", room = %code, "private game auto-started");
            self.start_game(&code);
        }
        Ok(())
    }

    fn relay_action(&mut self, id: ConnectionId, code: RoomCode, action: Action) -> Result<()> {
        let room = self
            .rooms
            .get(&code)
            .ok_or_else(|| RuntimeError::RoomNotFound { code: code.clone() })?;
        if !room.is_member(id) {
            return Err(RuntimeError::NotInRoom { code });
        }
        let worker = room
            .worker
            .as_ref()
            .ok_or_else(|| RuntimeError::GameNotStarted { code: code.clone() })?;

        match worker.try_send(RoomCommand::Action { from: id, action }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(RuntimeError::RoomBusy { code }),
            Err(TrySendError::Closed(_)) => {
                error!(target: "runtime::room", room = %code, "room worker stopped unexpectedly");
                Err(RuntimeError::CommandChannelClosed)
            }
        }
    }

    /// Spawns the room actor that owns the game from here on.
    fn start_game(&mut self, code: &RoomCode) {
        let seed = self.rng.r#gen::<u64>();
        let Some(room) = self.rooms.get_mut(code) else {
            return;
        };

        let members = room
            .players
            .iter()
            .filter_map(|p| {
                let connection = self.connections.get(&p.id)?;
                Some(RoomMember {
                    id: p.id,
                    role: p.role,
                    outbound: connection.outbound.clone(),
                })
            })
            .collect();

        let (command_tx, command_rx) = mpsc::channel(self.config.room_command_buffer_size);
        let worker = RoomWorker::new(
            code.clone(),
            self.config.game_config.clone(),
            Some(seed),
            members,
            command_rx,
            self.command_tx.clone(),
        );
        tokio::spawn(worker.run());
        room.worker = Some(command_tx);
    }

    fn fresh_code(&mut self) -> RoomCode {
        loop {
            let code = RoomCode::generate(&mut self.rng, self.config.room_code_len);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    fn stats(&self) -> LobbyStats {
        LobbyStats {
            queued: self.queue.len(),
            rooms: self.rooms.len(),
            connected: self.connections.len(),
        }
    }

    fn broadcast_queue(&self) {
        let count = self.queue.len();
        for (id, _) in &self.queue {
            self.send(*id, ServerMessage::queue_update(count));
        }
    }

    fn broadcast_active_count(&self) {
        let count = self.connections.len();
        for id in self.connections.keys() {
            self.send(*id, ServerMessage::ActivePlayersCount(count));
        }
    }

    fn send(&self, id: ConnectionId, message: ServerMessage) {
        let Some(connection) = self.connections.get(&id) else {
            return;
        };
        if connection.outbound.send(message).is_err() {
            debug!(target: "runtime::lobby", conn = %id, "outbound channel closed (connection dropped)");
        }
    }
}

fn username_or(username: Option<String>, default: impl FnOnce() -> String) -> String {
    username
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(default)
}
