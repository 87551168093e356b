//! Action provider implementations for seats without a local human.

pub mod bot;

pub use bot::{BotConfig, BotProvider};
