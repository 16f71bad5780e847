//! Server configuration from process environment

use serde::Serialize;

pub const DEFAULT_PORT: u16 = 8888;

/// TURN relay credentials, passed through to clients unexamined.
/// Absent environment variables become empty strings, never errors.
#[derive(Debug, Clone, Serialize)]
pub struct TurnConfig {
    pub urls: String,
    pub username: String,
    pub credential: String,
}

impl TurnConfig {
    pub fn from_env() -> Self {
        Self {
            urls: env_or_empty("TURN_URL"),
            username: env_or_empty("TURN_USERNAME"),
            credential: env_or_empty("TURN_CREDENTIAL"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub turn: TurnConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            turn: TurnConfig::from_env(),
        }
    }
}

fn env_or_empty(key: &str) -> String {
    std::env::var(key).unwrap_or_default()
}
