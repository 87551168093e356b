//! Deterministic rules for the four-seat race-and-capture stick game.
//!
//! `game-core` defines the canonical rules (board topology, state, actions and
//! the transition engine) and exposes pure APIs reused by the orchestrator,
//! the local bot runner and every client mirror. All state mutation flows
//! through [`engine::GameEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{
    Action, ActionKind, ActionTransition, BonusReason, Effect, EndRollingAction,
    EndRollingError, LegalMove, LegalMoves, MoveAction, MoveError, PassReason, RollAction,
    RollError, legal_moves,
};
pub use board::{Cell, PathSegment};
pub use config::{GameConfig, TurnOrder, TurnOrderError};
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, Transition, TransitionPhase,
    TransitionPhaseError, apply, apply_or_ignore,
};
pub use error::{ErrorSeverity, GameError};
pub use rng::{PcgRng, RngOracle};
pub use state::{GameState, Phase, PiecePosition, RollPool, Seat, StickThrow};
