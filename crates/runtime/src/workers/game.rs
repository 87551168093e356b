//! Game worker that owns the authoritative [`game_core::GameState`] of the
//! local runner.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), executes
//! actions through the [`Referee`] and publishes events to the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use game_core::{Action, ExecuteError, ExecutionOutcome, GameError, GameState};

use crate::events::{Event, EventBus, GameStateEvent, TurnEvent};
use crate::referee::Referee;

/// Commands that can be sent to the game worker.
pub enum GameCommand {
    /// Execute an action; unresolved rolls are drawn by the worker.
    ExecuteAction {
        action: Action,
        reply: oneshot::Sender<Result<ExecutionOutcome, ExecuteError>>,
    },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Stop the worker even while other handles are still alive.
    Shutdown,
}

/// Background task that serializes every mutation of one game.
///
/// The worker does not own providers; the [`Runtime`](crate::Runtime) asks
/// them for intents and submits the result here.
pub struct GameWorker {
    referee: Referee,
    command_rx: mpsc::Receiver<GameCommand>,
    event_bus: EventBus,
}

impl GameWorker {
    pub fn new(referee: Referee, command_rx: mpsc::Receiver<GameCommand>, event_bus: EventBus) -> Self {
        info!(
            target: "runtime::game",
            current_seat = %referee.state().current_seat,
            nonce = referee.state().nonce,
            "game worker initialized"
        );

        Self {
            referee,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop; ends on [`GameCommand::Shutdown`] or once every
    /// handle is dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                else => break,
            }
        }
        debug!(target: "runtime::game", nonce = self.referee.state().nonce, "game worker stopped");
    }

    fn handle_command(&mut self, cmd: GameCommand) -> bool {
        match cmd {
            GameCommand::ExecuteAction { action, reply } => {
                let result = self.execute_action(action);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::game", "ExecuteAction reply channel closed (caller dropped)");
                }
            }
            GameCommand::QueryState { reply } => {
                if reply.send(self.referee.state().clone()).is_err() {
                    debug!(target: "runtime::game", "QueryState reply channel closed (caller dropped)");
                }
            }
            GameCommand::Shutdown => return false,
        }
        true
    }

    fn execute_action(&mut self, action: Action) -> Result<ExecutionOutcome, ExecuteError> {
        let nonce = self.referee.state().nonce;

        match self.referee.execute(action.clone()) {
            Ok((resolved, outcome)) => {
                debug!(
                    target: "runtime::game",
                    nonce,
                    action = %resolved,
                    effects = outcome.effects.len(),
                    status = %self.referee.state().status,
                    "action executed"
                );

                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionExecuted {
                        nonce,
                        action: resolved,
                        effects: outcome.effects.clone(),
                        after_state: Box::new(self.referee.state().clone()),
                    }));
                for event in TurnEvent::from_effects(&outcome.effects) {
                    if let TurnEvent::GameOver { winner } = event {
                        info!(target: "runtime::game", winner = %winner, nonce, "game over");
                    }
                    self.event_bus.publish(Event::Turn(event));
                }

                Ok(outcome)
            }
            Err(error) => {
                debug!(
                    target: "runtime::game",
                    nonce,
                    action = %action,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    out_of_phase = error.is_out_of_phase(),
                    error = %error,
                    "action rejected"
                );

                self.event_bus
                    .publish(Event::GameState(GameStateEvent::ActionRejected {
                        nonce,
                        action,
                        phase: error.transition_phase(),
                        error: error.to_string(),
                    }));

                Err(error)
            }
        }
    }
}
