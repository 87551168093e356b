//! Client-side copy of a room's game.
//!
//! A mirror runs the same rules engine as the room. Local intents are applied
//! optimistically, peer actions arrive as `sync_action` and are replayed, and
//! every `state_update` replaces the local state wholesale: the room's copy
//! is canonical.

use game_core::{Action, Effect, GameConfig, GameState, Seat, apply_or_ignore};
use tracing::{debug, warn};

use crate::protocol::ServerMessage;

#[derive(Debug, Clone)]
pub struct ClientMirror {
    seat: Option<Seat>,
    state: GameState,
    config: GameConfig,
}

impl ClientMirror {
    pub fn new(config: GameConfig) -> Self {
        Self {
            seat: None,
            state: GameState::new(&config),
            config,
        }
    }

    /// Seat assigned by `match_found` or `game_start`.
    pub fn seat(&self) -> Option<Seat> {
        self.seat
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// True when the local seat is the one to act.
    pub fn is_my_turn(&self) -> bool {
        self.seat == Some(self.state.current_seat) && !self.state.is_over()
    }

    /// Optimistically applies the local player's intent.
    ///
    /// Unresolved rolls are left to the room, which draws the throw and
    /// answers with a `state_update`.
    pub fn apply_local(&mut self, action: &Action) -> Vec<Effect> {
        if !action.is_resolved() {
            return Vec::new();
        }
        self.apply(action)
    }

    /// Replays an action relayed from a peer.
    pub fn apply_remote(&mut self, action: &Action) -> Vec<Effect> {
        self.apply(action)
    }

    /// Adopts the room's canonical state. Returns whether the local copy had
    /// diverged from it.
    pub fn replace(&mut self, state: GameState) -> bool {
        let diverged = self.state != state;
        if diverged {
            debug!(
                target: "runtime::mirror",
                local_nonce = self.state.nonce,
                canonical_nonce = state.nonce,
                "local state replaced by canonical state"
            );
        }
        self.state = state;
        diverged
    }

    /// Folds one server message into the mirror; non-game messages are
    /// ignored apart from seat assignment.
    pub fn apply_server_message(&mut self, message: &ServerMessage) -> Vec<Effect> {
        match message {
            ServerMessage::MatchFound { role, .. } | ServerMessage::GameStart { role, .. } => {
                self.seat = Some(*role);
                self.state = GameState::new(&self.config);
                Vec::new()
            }
            ServerMessage::SyncAction(action) => self.apply_remote(action),
            ServerMessage::StateUpdate { state } => {
                self.replace(state.as_ref().clone());
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn apply(&mut self, action: &Action) -> Vec<Effect> {
        let (state, effects) = apply_or_ignore(&self.state, &self.config, action);
        if effects.is_empty() && state == self.state {
            warn!(
                target: "runtime::mirror",
                action = %action,
                nonce = self.state.nonce,
                "action ignored by local rules"
            );
        }
        self.state = state;
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::StickThrow;

    fn throw(value: u8) -> StickThrow {
        StickThrow::for_value(value).unwrap()
    }

    #[test]
    fn remote_actions_replay_deterministically() {
        let config = GameConfig::default();
        let mut a = ClientMirror::new(config.clone());
        let mut b = ClientMirror::new(config);

        let action = Action::roll_with(Seat::P1, throw(4));
        let effects = a.apply_local(&action);
        assert!(!effects.is_empty());
        b.apply_remote(&action);

        assert_eq!(a.state(), b.state());
        assert_eq!(a.state().nonce, 1);
    }

    #[test]
    fn unresolved_rolls_wait_for_the_room() {
        let mut mirror = ClientMirror::new(GameConfig::default());
        assert!(mirror.apply_local(&Action::roll(Seat::P1)).is_empty());
        assert_eq!(mirror.state().nonce, 0);
    }

    #[test]
    fn canonical_state_wins() {
        let config = GameConfig::default();
        let mut mirror = ClientMirror::new(config.clone());
        mirror.apply_local(&Action::roll_with(Seat::P1, throw(4)));

        let canonical = GameState::new(&config);
        assert!(mirror.replace(canonical.clone()));
        assert_eq!(mirror.state(), &canonical);
        assert!(!mirror.replace(canonical));
    }

    #[test]
    fn seat_comes_from_match_found() {
        let mut mirror = ClientMirror::new(GameConfig::default());
        mirror.apply_server_message(&ServerMessage::GameStart {
            role: Seat::P1,
            players: Vec::new(),
        });
        assert_eq!(mirror.seat(), Some(Seat::P1));
        assert!(mirror.is_my_turn());
    }
}
