//! Root configuration types.

use super::assets::AssetsConfig;
use super::defaults::default_port;
use super::game::GameConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::websocket::WebSocketConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub websocket: WebSocketConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            game: GameConfig::default(),
            assets: AssetsConfig::default(),
            logging: LoggingConfig::default(),
            websocket: WebSocketConfig::default(),
        }
    }
}
