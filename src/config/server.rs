//! Server-wide configuration: bind address, room bookkeeping, CORS.

use super::defaults::{
    default_cors_origins, default_empty_room_timeout_secs, default_max_rooms,
    default_room_cleanup_interval_secs,
};
use serde::{Deserialize, Serialize};

/// Server configuration: room store bookkeeping and allowed browser origins.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Interval for the periodic disconnected-participant sweep (seconds).
    #[serde(default = "default_room_cleanup_interval_secs")]
    pub room_cleanup_interval_secs: u64,
    /// Maximum number of concurrently live rooms.
    #[serde(default = "default_max_rooms")]
    pub max_rooms: usize,
    /// How long an empty room (all participants left, no disconnection in
    /// progress) survives before the sweep destroys it (seconds).
    #[serde(default = "default_empty_room_timeout_secs")]
    pub empty_room_timeout_secs: u64,
    /// Browser origins allowed to open a WebSocket connection.
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            room_cleanup_interval_secs: default_room_cleanup_interval_secs(),
            max_rooms: default_max_rooms(),
            empty_room_timeout_secs: default_empty_room_timeout_secs(),
            cors_allowed_origins: default_cors_origins(),
        }
    }
}
