//! Room actor owning the authoritative game of one started room.
//!
//! The lobby forwards `game_action` requests here after checking membership.
//! The room checks the seat, resolves random rolls with its own RNG and runs
//! the action through the rules engine. Accepted actions are relayed to the
//! other members as `sync_action` and followed by a canonical `state_update`
//! for everyone; rejected ones only produce an `error_message` to the sender.
//! A winning action is reported to the lobby before anyone sees it, so a
//! member's next join already finds the room finished.

use game_core::{Action, GameConfig, GameError, Seat};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::LobbyCommand;
use crate::api::RuntimeError;
use crate::lobby::RoomCode;
use crate::protocol::{ConnectionId, ServerMessage};
use crate::referee::Referee;

/// Commands accepted by a room actor.
pub enum RoomCommand {
    Action { from: ConnectionId, action: Action },
    Leave { id: ConnectionId },
}

/// Seated connection as seen by the room actor.
pub struct RoomMember {
    pub id: ConnectionId,
    pub role: Seat,
    pub outbound: mpsc::UnboundedSender<ServerMessage>,
}

pub struct RoomWorker {
    code: RoomCode,
    referee: Referee,
    members: Vec<RoomMember>,
    command_rx: mpsc::Receiver<RoomCommand>,
    lobby: mpsc::WeakSender<LobbyCommand>,
}

impl RoomWorker {
    pub fn new(
        code: RoomCode,
        config: GameConfig,
        seed: Option<u64>,
        members: Vec<RoomMember>,
        command_rx: mpsc::Receiver<RoomCommand>,
        lobby: mpsc::WeakSender<LobbyCommand>,
    ) -> Self {
        Self {
            code,
            referee: Referee::new(config, seed),
            members,
            command_rx,
            lobby,
        }
    }

    /// Main worker loop; ends when the lobby drops the room.
    pub async fn run(mut self) {
        info!(target: "runtime::room", room = %self.code, "game started");
        self.broadcast_state();

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                RoomCommand::Action { from, action } => self.handle_action(from, action).await,
                RoomCommand::Leave { id } => {
                    self.members.retain(|m| m.id != id);
                    debug!(
                        target: "runtime::room",
                        room = %self.code,
                        conn = %id,
                        remaining = self.members.len(),
                        "member left"
                    );
                }
            }
        }

        debug!(target: "runtime::room", room = %self.code, "room closed");
    }

    async fn handle_action(&mut self, from: ConnectionId, action: Action) {
        let Some(role) = self.members.iter().find(|m| m.id == from).map(|m| m.role) else {
            warn!(target: "runtime::room", room = %self.code, conn = %from, "action from non-member");
            return;
        };

        if action.seat != role {
            let error = RuntimeError::NotYourSeat {
                seat: action.seat,
                role,
            };
            self.send_to(from, ServerMessage::error(error.to_string()));
            return;
        }

        match self.referee.execute(action) {
            Ok((resolved, outcome)) => {
                debug!(
                    target: "runtime::room",
                    room = %self.code,
                    seat = %role,
                    action = %resolved,
                    nonce = self.referee.state().nonce,
                    effects = outcome.effects.len(),
                    "action accepted"
                );
                if let Some(winner) = self.referee.state().winner() {
                    info!(target: "runtime::room", room = %self.code, winner = %winner, "game over");
                    self.report_finished().await;
                }

                for member in self.members.iter().filter(|m| m.id != from) {
                    send(member, ServerMessage::SyncAction(resolved.clone()));
                }
                self.broadcast_state();
            }
            Err(error) => {
                if error.severity().is_internal() {
                    error!(target: "runtime::room", room = %self.code, error = %error, "rules invariant violated");
                }
                debug!(
                    target: "runtime::room",
                    room = %self.code,
                    seat = %role,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    out_of_phase = error.is_out_of_phase(),
                    error = %error,
                    "action rejected"
                );
                self.send_to(from, ServerMessage::error(RuntimeError::Rejected(error).to_string()));
            }
        }
    }

    async fn report_finished(&self) {
        let Some(lobby) = self.lobby.upgrade() else {
            return;
        };
        let finished = LobbyCommand::RoomFinished {
            code: self.code.clone(),
        };
        if lobby.send(finished).await.is_err() {
            debug!(target: "runtime::room", room = %self.code, "lobby stopped before the game ended");
        }
    }

    fn broadcast_state(&self) {
        let state = Box::new(self.referee.state().clone());
        for member in &self.members {
            send(member, ServerMessage::StateUpdate {
                state: state.clone(),
            });
        }
    }

    fn send_to(&self, id: ConnectionId, message: ServerMessage) {
        if let Some(member) = self.members.iter().find(|m| m.id == id) {
            send(member, message);
        }
    }
}

fn send(member: &RoomMember, message: ServerMessage) {
    if member.outbound.send(message).is_err() {
        debug!(target: "runtime::room", conn = %member.id, "outbound channel closed (connection dropped)");
    }
}
