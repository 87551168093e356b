//! Authoritative owner of one game.
//!
//! A [`Referee`] holds the canonical [`GameState`], the rules configuration
//! and the RNG used to draw stick throws. Both the local runner's game worker
//! and every orchestrator room drive their game through one.

use game_core::{
    Action, ExecuteError, ExecutionOutcome, GameConfig, GameEngine, GameState, PcgRng,
};

pub struct Referee {
    state: GameState,
    config: GameConfig,
    rng: PcgRng,
}

impl Referee {
    /// Fresh game; without a seed the RNG is seeded from the OS.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        Self::with_state(GameState::new(&config), config, seed)
    }

    pub fn with_state(state: GameState, config: GameConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            state,
            config,
            rng: PcgRng::seeded(seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Draws the throw for an unresolved roll, then executes the action.
    ///
    /// Returns the resolved action, which is what peers must replay to reach
    /// the same state.
    pub fn execute(&mut self, action: Action) -> Result<(Action, ExecutionOutcome), ExecuteError> {
        let action = action.resolve(&mut self.rng);
        let outcome = GameEngine::new(&mut self.state, &self.config).execute(&action)?;
        Ok((action, outcome))
    }
}
