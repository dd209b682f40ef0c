use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;
use super::types::{ParticipantId, PromptId, SoundId};
use crate::game::phase::GamePhase;
use crate::game::room::RoomSnapshot;

/// Settings a host may change while the room is in `LOBBY` (§6
/// `updateGameSettings` payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub max_rounds: u32,
    pub max_score: u32,
    pub allow_explicit_content: bool,
}

/// A participant's requested appearance on join/create; the allocator
/// assigns a collision-free substitute if the request is taken or absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceRequest {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

/// Messages sent from participants and viewers to the server.
///
/// Participant-origin and viewer-origin events share one wire enum because
/// both arrive on the same per-connection channel; the dispatcher decides
/// which handler applies based on whether the sending connection has
/// registered as a participant or as a viewer (§4.8, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Create a new room with the caller as sole host.
    CreateRoom {
        name: String,
        #[serde(default)]
        appearance: AppearanceRequest,
    },
    /// Join an existing room in `LOBBY`.
    JoinRoom {
        room_code: String,
        name: String,
        #[serde(default)]
        appearance: AppearanceRequest,
    },
    /// Rebind a disconnected participant's session to this connection.
    ReconnectToRoom {
        room_code: String,
        name: String,
        original_participant_id: ParticipantId,
    },
    /// Leave the current room voluntarily.
    LeaveRoom,
    /// Host-only: begin the game from `LOBBY`.
    StartGame,
    /// Host-only, `LOBBY`-only: change round/score/content settings.
    UpdateGameSettings(GameSettings),
    /// Judge-only, `PROMPT_SELECTION`-only.
    SelectPrompt { prompt_id: PromptId },
    /// Non-judge-only, `SOUND_SELECTION`-only: 1-2 sound ids.
    SubmitSounds { sound_ids: Vec<SoundId> },
    /// Judge-only, `JUDGING`-only: index into the randomized submission order.
    SelectWinner { index: String },
    /// Answer to a `reconnectionVoteRequest`.
    VoteOnReconnection { continue_without_player: bool },
    /// Signal that a round-results winner-audio clip finished playing.
    WinnerAudioComplete,
    /// Judge-only, `JUDGING`-only: ask to play the judge's local copy, or
    /// have viewers play it.
    RequestJudgingPlayback,
    /// Host-only, `GAME_OVER`-only: reset the room back to `LOBBY`.
    RestartGame,

    /// Join a room as a passive viewer.
    JoinRoomAsViewer {
        room_code: String,
        #[serde(default)]
        name: Option<String>,
    },
    /// Primary-viewer-only: advance playback to the next submission.
    RequestNextSubmission,
    /// Viewer request for a fresh full-room snapshot.
    RequestMainScreenUpdate,
}

/// The full room state a client needs to render the room (§6 `roomUpdated`
/// "carries the full room snapshot").
pub type RoomUpdatePayload = RoomSnapshot;

/// Phase-specific payload accompanying `gameStateChanged` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateChangedPayload {
    pub phase: GamePhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_id: Option<ParticipantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_prompts: Option<Vec<PromptSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Vec<SubmissionSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomized_submissions: Option<Vec<SubmissionSummary>>,
    pub current_round: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSummary {
    pub id: PromptId,
    pub text: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub sound_ids: Vec<SoundId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundCompletePayload {
    pub winner_id: ParticipantId,
    pub winner_name: String,
    pub winning_sound_ids: Vec<SoundId>,
    pub scores: Vec<(ParticipantId, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCompletePayload {
    pub winner_id: ParticipantId,
    pub final_scores: Vec<(ParticipantId, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakerPayload {
    pub tied_participant_ids: Vec<ParticipantId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconnectionVoteRequestPayload {
    pub disconnected_name: String,
    pub time_left_seconds: u32,
}

/// Messages sent from the server to participants and viewers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Reply to `CreateRoom`.
    RoomCreated { room_code: String },
    /// Reply to `JoinRoom`/`JoinRoomAsViewer` on success.
    RoomJoined(Box<RoomUpdatePayload>),
    /// Reply to `JoinRoom`/`CreateRoom`/`ReconnectToRoom` on failure (§7
    /// capacity errors — no separate `error` event needed).
    RoomJoinFailed {
        reason: String,
        error_code: ErrorCode,
    },
    /// Broadcast whenever room membership or settings change.
    RoomUpdated(Box<RoomUpdatePayload>),
    /// Broadcast on every phase transition.
    GameStateChanged(Box<GameStateChangedPayload>),
    PlayerJoined { participant_id: ParticipantId, name: String },
    PlayerLeft { participant_id: ParticipantId },
    PlayerDisconnected { participant_id: ParticipantId, name: String },
    PlayerReconnected { participant_id: ParticipantId },
    ReconnectionVoteRequest(ReconnectionVoteRequestPayload),
    ReconnectionVoteUpdate { time_left_seconds: u32 },
    ReconnectionVoteResult { continued_without_player: bool },
    GamePausedForDisconnection { disconnected_name: String },
    GameResumed { resumed_phase: GamePhase },
    JudgeSelected { judge_id: ParticipantId },
    PromptSelected { prompt: PromptSummary },
    SoundSubmitted { participant_id: ParticipantId },
    RoundComplete(RoundCompletePayload),
    GameComplete(GameCompletePayload),
    GameSettingsUpdated(GameSettings),
    TimeUpdate { seconds_remaining: u32 },
    PlaySubmission { submission: SubmissionSummary, index: usize },
    PlayJudgingSubmission { submission: SubmissionSummary },
    TieBreakerRound(TieBreakerPayload),
    MainScreenUpdate(Box<RoomUpdatePayload>),
    RoomClosed { room_code: String },
    Error {
        message: String,
        error_code: ErrorCode,
    },
}
