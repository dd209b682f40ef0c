//! Gameplay configuration: room capacity, settings bounds, and the fixed
//! timeouts from §5 ("Timeouts") and §4.6 (disconnection protocol).

use super::defaults::{
    default_auto_winner_audio_delay_secs, default_judge_selection_secs, default_max_participants,
    default_max_rounds_limit, default_max_score_limit, default_min_participants,
    default_min_rounds, default_min_score, default_post_win_celebration_secs,
    default_prompt_selection_secs, default_reconnection_grace_secs, default_reconnection_vote_secs,
    default_sound_selection_secs,
};
use serde::{Deserialize, Serialize};

/// Gameplay bounds and timer durations.
///
/// The numeric timeouts are drawn directly from §5; they are configurable
/// mainly so tests can shrink them, not because operators are expected to
/// retune celebration delays in production.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GameConfig {
    /// Fewest active participants required to start a game.
    #[serde(default = "default_min_participants")]
    pub min_participants: usize,
    /// Most active participants a room admits.
    #[serde(default = "default_max_participants")]
    pub max_participants: usize,
    /// Lower bound accepted by `updateGameSettings.maxRounds`.
    #[serde(default = "default_min_rounds")]
    pub min_rounds: u32,
    /// Upper bound accepted by `updateGameSettings.maxRounds`.
    #[serde(default = "default_max_rounds_limit")]
    pub max_rounds_limit: u32,
    /// Lower bound accepted by `updateGameSettings.maxScore`.
    #[serde(default = "default_min_score")]
    pub min_score: u32,
    /// Upper bound accepted by `updateGameSettings.maxScore`.
    #[serde(default = "default_max_score_limit")]
    pub max_score_limit: u32,
    /// JUDGE_SELECTION auto-advance delay (seconds).
    #[serde(default = "default_judge_selection_secs")]
    pub judge_selection_secs: u64,
    /// PROMPT_SELECTION timeout (seconds).
    #[serde(default = "default_prompt_selection_secs")]
    pub prompt_selection_secs: u64,
    /// SOUND_SELECTION timeout, started on first submission (seconds).
    #[serde(default = "default_sound_selection_secs")]
    pub sound_selection_secs: u64,
    /// Disconnection grace period before a reconnection vote starts (seconds).
    #[serde(default = "default_reconnection_grace_secs")]
    pub reconnection_grace_secs: u64,
    /// Reconnection vote window (seconds).
    #[serde(default = "default_reconnection_vote_secs")]
    pub reconnection_vote_secs: u64,
    /// ROUND_RESULTS -> next round/GAME_OVER celebration delay (seconds).
    #[serde(default = "default_post_win_celebration_secs")]
    pub post_win_celebration_secs: u64,
    /// Delay before the server self-signals `winnerAudioComplete` when a
    /// room has no viewers (seconds).
    #[serde(default = "default_auto_winner_audio_delay_secs")]
    pub auto_winner_audio_delay_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_participants: default_min_participants(),
            max_participants: default_max_participants(),
            min_rounds: default_min_rounds(),
            max_rounds_limit: default_max_rounds_limit(),
            min_score: default_min_score(),
            max_score_limit: default_max_score_limit(),
            judge_selection_secs: default_judge_selection_secs(),
            prompt_selection_secs: default_prompt_selection_secs(),
            sound_selection_secs: default_sound_selection_secs(),
            reconnection_grace_secs: default_reconnection_grace_secs(),
            reconnection_vote_secs: default_reconnection_vote_secs(),
            post_win_celebration_secs: default_post_win_celebration_secs(),
            auto_winner_audio_delay_secs: default_auto_winner_audio_delay_secs(),
        }
    }
}
