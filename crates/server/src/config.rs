//! Environment-driven server configuration.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use game_core::GameConfig;
use runtime::LobbyConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub lobby: LobbyConfig,
}

impl ServerConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3001;

    /// Reads `BIND_ADDR`, `PORT`, `GAME_SEED`, `BONUS_ON_CAPTURE`,
    /// `BONUS_ON_ENTRY` and `ROOM_COMMAND_BUFFER`. Unset or unparsable values
    /// fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let trimmed = |key: &str| lookup(key).map(|v| v.trim().to_owned());
        let flag = |key: &str| lookup(key).and_then(|v| parse_bool(&v));

        let defaults = LobbyConfig::default();
        let game_config = GameConfig::default()
            .with_bonus_on_capture(flag("BONUS_ON_CAPTURE").unwrap_or(true))
            .with_bonus_on_entry(flag("BONUS_ON_ENTRY").unwrap_or(true));

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_owned()),
            port: trimmed("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(Self::DEFAULT_PORT),
            lobby: LobbyConfig {
                room_command_buffer_size: trimmed("ROOM_COMMAND_BUFFER")
                    .and_then(|v| v.parse().ok())
                    .filter(|&n: &usize| n > 0)
                    .unwrap_or(defaults.room_command_buffer_size),
                game_config,
                seed: trimmed("GAME_SEED").and_then(|v| v.parse().ok()),
                ..defaults
            },
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.bind_addr, self.port))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
