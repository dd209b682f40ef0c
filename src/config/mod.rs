//! Configuration module.
//!
//! Provides comprehensive configuration management with support for:
//! - JSON configuration files
//! - Environment variable overrides
//! - Stdin input
//! - Sensible defaults
//!
//! # Module Structure
//!
//! - [`types`]: Root `Config` struct
//! - [`server`]: Room bookkeeping and CORS
//! - [`game`]: Gameplay bounds and timer durations
//! - [`assets`]: Asset catalog file locations and cache TTL
//! - [`logging`]: Logging configuration
//! - [`websocket`]: WebSocket transport settings
//! - [`loader`]: Configuration loading functions
//! - [`validation`]: Configuration validation functions
//! - [`defaults`]: Default value functions

pub mod assets;
pub mod defaults;
pub mod game;
pub mod loader;
pub mod logging;
pub mod server;
pub mod types;
pub mod validation;
pub mod websocket;

pub use assets::AssetsConfig;
pub use game::GameConfig;
pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use server::ServerConfig;
pub use types::Config;
pub use validation::{is_production_mode, validate_config};
pub use websocket::WebSocketConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 3536);
        assert_eq!(config.game.min_participants, 3);
        assert_eq!(config.game.max_participants, 8);
        assert_eq!(config.game.judge_selection_secs, 3);
        assert_eq!(config.game.prompt_selection_secs, 30);
        assert_eq!(config.game.sound_selection_secs, 45);
        assert_eq!(config.game.reconnection_grace_secs, 30);
        assert_eq!(config.game.reconnection_vote_secs, 20);
        assert_eq!(config.game.post_win_celebration_secs, 3);
        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "server.log");
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(config.game.max_rounds_limit, deserialized.game.max_rounds_limit);
        assert_eq!(config.assets.prompts_path, deserialized.assets.prompts_path);
    }

    #[test]
    fn validate_config_rejects_inverted_bounds() {
        let mut config = Config::default();
        config.game.max_participants = 2;
        config.game.min_participants = 3;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }
}
