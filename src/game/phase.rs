use serde::{Deserialize, Serialize};

/// The room's game phase (§4.2). Nine states total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    JudgeSelection,
    PromptSelection,
    SoundSelection,
    Playback,
    Judging,
    RoundResults,
    GameOver,
    PausedForDisconnection,
}

impl GamePhase {
    /// Whether inbound game events are processed in this phase. Disconnection
    /// handling always bypasses this (§4.6 "Inbound game events are not
    /// processed while paused").
    pub fn accepts_game_events(self) -> bool {
        !matches!(self, Self::PausedForDisconnection)
    }
}
