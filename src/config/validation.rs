//! Configuration validation functions.

use super::Config;

/// Validate configuration invariants that aren't expressible through serde
/// defaults alone.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.game.min_participants < 2 {
        anyhow::bail!("game.min_participants must be at least 2");
    }
    if config.game.max_participants < config.game.min_participants {
        anyhow::bail!("game.max_participants must be >= game.min_participants");
    }
    if config.game.min_rounds == 0 {
        anyhow::bail!("game.min_rounds must be at least 1");
    }
    if config.game.max_rounds_limit < config.game.min_rounds {
        anyhow::bail!("game.max_rounds_limit must be >= game.min_rounds");
    }
    if config.game.min_score == 0 {
        anyhow::bail!("game.min_score must be at least 1");
    }
    if config.game.max_score_limit < config.game.min_score {
        anyhow::bail!("game.max_score_limit must be >= game.min_score");
    }
    config.websocket.validate()?;
    Ok(())
}

/// Detect if we're running in production mode.
///
/// Checks for `ECHOFEST__ENVIRONMENT` or generic `PRODUCTION` / `PROD`
/// environment variables.
pub fn is_production_mode() -> bool {
    use std::env;

    if let Ok(mode) = env::var("ECHOFEST__ENVIRONMENT") {
        return mode.eq_ignore_ascii_case("production") || mode.eq_ignore_ascii_case("prod");
    }

    env::var("ECHOFEST_PRODUCTION").is_ok() || env::var("PRODUCTION").is_ok() || env::var("PROD").is_ok()
}
