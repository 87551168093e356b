//! Cloneable façade for issuing commands to the local runner.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! executing actions or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Action, ExecutionOutcome, GameState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::GameCommand;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<GameCommand>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<GameCommand>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Execute an action for the seat whose turn it is.
    ///
    /// A rules rejection comes back as [`RuntimeError::Rejected`] and leaves
    /// the game unchanged.
    pub async fn execute_action(&self, action: Action) -> Result<ExecutionOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(GameCommand::ExecuteAction {
                action,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        Ok(reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)??)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Action execution and rejections
    /// - `Topic::Turn` - Turn hand-over and game end
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut turn_rx = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turn_rx.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Query the current game state (read-only snapshot)
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(GameCommand::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Asks the game worker to stop; later commands from any clone fail
    /// with [`RuntimeError::CommandChannelClosed`].
    pub(crate) async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(GameCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
