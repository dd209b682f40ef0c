//! The per-room actor: one task per live room, owning that room's `Room`,
//! viewer registry, and timer slot, driven entirely by a `RoomCommand`
//! queue (§9 "model each room as an actor with an inbound command queue").
//!
//! Every mutation of a room's state happens inside this task. There is no
//! lock to take and no possibility of two handlers interleaving their
//! writes, because the task processes exactly one command at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument};

use super::connection_manager::ConnectionManager;
use super::room_store::{RoomHandle, RoomStore};
use super::timers::{TimerKind, TimerRegistry};
use super::{disconnection_handlers, game_handlers, room_service, viewer_handlers};
use crate::assets::AssetCatalog;
use crate::config::GameConfig;
use crate::game::room::{Room, RoomSnapshot};
use crate::game::scoring::RoundOutcome;
use crate::protocol::messages::{AppearanceRequest, GameSettings, ServerMessage};
use crate::protocol::types::{ParticipantId, PromptId, SoundId, ViewerId};
use crate::protocol::ErrorCode;
use crate::viewers::ViewerRegistry;

/// Result handed back to the connection task that asked to join or create
/// a room, over a `oneshot` paired with the command.
pub enum JoinOutcome {
    Success {
        participant_id: ParticipantId,
        snapshot: RoomSnapshot,
    },
    Failure {
        reason: String,
        error_code: ErrorCode,
    },
}

pub enum ViewerJoinOutcome {
    Success {
        viewer_id: ViewerId,
        snapshot: RoomSnapshot,
    },
    Failure {
        reason: String,
        error_code: ErrorCode,
    },
}

/// Everything a connection needs to route inbound events to this room and
/// receive outbound events back (set up once per registration).
pub struct JoinRequest {
    pub name: String,
    pub appearance: AppearanceRequest,
    pub outbox: mpsc::Sender<ServerMessage>,
    pub reply: oneshot::Sender<JoinOutcome>,
}

pub struct ReconnectRequest {
    pub name: String,
    pub original_participant_id: ParticipantId,
    pub outbox: mpsc::Sender<ServerMessage>,
    pub reply: oneshot::Sender<JoinOutcome>,
}

pub struct ViewerJoinRequest {
    pub name: Option<String>,
    pub outbox: mpsc::Sender<ServerMessage>,
    pub reply: oneshot::Sender<ViewerJoinOutcome>,
}

/// The full set of events a room actor can process: inbound client events,
/// viewer events, connection-lifecycle events, and timer callbacks.
pub enum RoomCommand {
    Join(JoinRequest),
    Reconnect(ReconnectRequest),
    JoinAsViewer(ViewerJoinRequest),
    Leave {
        participant_id: ParticipantId,
    },
    Disconnected {
        participant_id: ParticipantId,
    },
    ViewerLeave {
        viewer_id: ViewerId,
    },
    StartGame {
        participant_id: ParticipantId,
    },
    UpdateGameSettings {
        participant_id: ParticipantId,
        settings: GameSettings,
    },
    SelectPrompt {
        participant_id: ParticipantId,
        prompt_id: PromptId,
    },
    SubmitSounds {
        participant_id: ParticipantId,
        sound_ids: Vec<SoundId>,
    },
    SelectWinner {
        participant_id: ParticipantId,
        index: String,
    },
    VoteOnReconnection {
        participant_id: ParticipantId,
        continue_without_player: bool,
    },
    WinnerAudioComplete {
        participant_id: ParticipantId,
    },
    RequestJudgingPlayback {
        participant_id: ParticipantId,
    },
    RestartGame {
        participant_id: ParticipantId,
    },
    RequestNextSubmission {
        viewer_id: ViewerId,
    },
    RequestMainScreenUpdate {
        viewer_id: ViewerId,
    },
    TimerExpired {
        kind: TimerKind,
        generation: u64,
    },
    TimerTick {
        kind: TimerKind,
        generation: u64,
        seconds_remaining: u32,
    },
    /// Periodic nudge from the maintenance sweep (§4.10).
    MaintenanceTick,
}

impl RoomCommand {
    /// The participant who issued this command, for commands that carry one.
    fn originating_participant_id(&self) -> Option<ParticipantId> {
        match self {
            RoomCommand::StartGame { participant_id }
            | RoomCommand::UpdateGameSettings { participant_id, .. }
            | RoomCommand::SelectPrompt { participant_id, .. }
            | RoomCommand::SubmitSounds { participant_id, .. }
            | RoomCommand::SelectWinner { participant_id, .. }
            | RoomCommand::WinnerAudioComplete { participant_id }
            | RoomCommand::RequestJudgingPlayback { participant_id }
            | RoomCommand::RestartGame { participant_id } => Some(*participant_id),
            _ => None,
        }
    }
}

/// Mutable context threaded through every handler. Orchestration-only
/// fields (not part of the wire snapshot) track multi-step transitions that
/// span several commands, such as the round-results celebration sequence.
pub struct RoomActorState {
    pub code: String,
    pub room: Room,
    pub viewers: ViewerRegistry,
    pub catalog: Arc<AssetCatalog>,
    pub config: Arc<GameConfig>,
    pub connections: Arc<ConnectionManager>,
    pub timers: TimerRegistry,
    pub store: Arc<RoomStore>,
    pub awaiting_winner_audio: bool,
    pub pending_round_outcome: Option<RoundOutcome>,
    pub became_empty_at: Option<DateTime<Utc>>,
    pub empty_room_timeout_secs: u64,
}

impl RoomActorState {
    pub fn active_participant_ids(&self) -> Vec<ParticipantId> {
        self.room.participants.iter().map(|p| p.id).collect()
    }

    pub fn viewer_ids(&self) -> Vec<ViewerId> {
        self.viewers.ids().to_vec()
    }

    /// Send one message to every active participant and viewer in the room.
    pub async fn broadcast(&self, message: ServerMessage) {
        self.connections
            .broadcast(&self.active_participant_ids(), &self.viewer_ids(), message)
            .await;
    }

    pub async fn broadcast_snapshot(&self) {
        let snapshot = self.snapshot();
        self.broadcast(ServerMessage::RoomUpdated(Box::new(snapshot))).await;
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        self.room.snapshot(self.viewers.count(), self.viewers.primary())
    }

    pub async fn send_error(&self, participant_id: ParticipantId, error_code: ErrorCode, message: impl Into<String>) {
        self.connections
            .send_to_participant(
                participant_id,
                ServerMessage::Error {
                    message: message.into(),
                    error_code,
                },
            )
            .await;
    }
}

/// Spawn a new room actor task and return a handle registered under `code`.
pub fn spawn(
    code: String,
    catalog: Arc<AssetCatalog>,
    config: Arc<GameConfig>,
    connections: Arc<ConnectionManager>,
    store: Arc<RoomStore>,
    empty_room_timeout_secs: u64,
) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(256);
    let handle = RoomHandle::new(sender.clone());
    store.insert(code.clone(), handle.clone());

    let state = RoomActorState {
        code: code.clone(),
        room: Room::new(code.clone(), Utc::now()),
        viewers: ViewerRegistry::new(),
        catalog,
        config,
        connections,
        timers: TimerRegistry::new(sender),
        store,
        awaiting_winner_audio: false,
        pending_round_outcome: None,
        became_empty_at: None,
        empty_room_timeout_secs,
    };

    tokio::spawn(run(state, receiver));
    handle
}

#[instrument(skip_all, fields(room = %state.code))]
async fn run(mut state: RoomActorState, mut receiver: mpsc::Receiver<RoomCommand>) {
    while let Some(command) = receiver.recv().await {
        dispatch(&mut state, command).await;
        if state.room.participants.is_empty() && state.viewers.is_empty() {
            if state.became_empty_at.is_none() {
                state.became_empty_at = Some(Utc::now());
            }
        } else {
            state.became_empty_at = None;
        }
    }
    info!(room = %state.code, "room actor channel closed, exiting");
}

/// Commands that advance gameplay and must not be processed while a room is
/// paused for a disconnection; the only way out of that phase is a
/// `VoteOnReconnection`, which is dispatched outside this guard.
fn is_gated_while_paused(command: &RoomCommand) -> bool {
    matches!(
        command,
        RoomCommand::StartGame { .. }
            | RoomCommand::UpdateGameSettings { .. }
            | RoomCommand::SelectPrompt { .. }
            | RoomCommand::SubmitSounds { .. }
            | RoomCommand::SelectWinner { .. }
            | RoomCommand::WinnerAudioComplete { .. }
            | RoomCommand::RequestJudgingPlayback { .. }
            | RoomCommand::RestartGame { .. }
            | RoomCommand::RequestNextSubmission { .. }
    )
}

async fn dispatch(state: &mut RoomActorState, command: RoomCommand) {
    if is_gated_while_paused(&command) && !state.room.phase.accepts_game_events() {
        if let Some(participant_id) = command.originating_participant_id() {
            state
                .send_error(participant_id, ErrorCode::WrongPhase, "Game is paused for a disconnection")
                .await;
        }
        return;
    }

    match command {
        RoomCommand::Join(request) => room_service::handle_join(state, request).await,
        RoomCommand::Reconnect(request) => room_service::handle_reconnect(state, request).await,
        RoomCommand::JoinAsViewer(request) => viewer_handlers::handle_join_as_viewer(state, request).await,
        RoomCommand::Leave { participant_id } => room_service::handle_leave(state, participant_id).await,
        RoomCommand::Disconnected { participant_id } => {
            room_service::handle_disconnected(state, participant_id).await
        }
        RoomCommand::ViewerLeave { viewer_id } => viewer_handlers::handle_viewer_leave(state, viewer_id).await,
        RoomCommand::StartGame { participant_id } => game_handlers::handle_start_game(state, participant_id).await,
        RoomCommand::UpdateGameSettings { participant_id, settings } => {
            game_handlers::handle_update_settings(state, participant_id, settings).await
        }
        RoomCommand::SelectPrompt { participant_id, prompt_id } => {
            game_handlers::handle_select_prompt(state, participant_id, prompt_id).await
        }
        RoomCommand::SubmitSounds { participant_id, sound_ids } => {
            game_handlers::handle_submit_sounds(state, participant_id, sound_ids).await
        }
        RoomCommand::SelectWinner { participant_id, index } => {
            game_handlers::handle_select_winner(state, participant_id, index).await
        }
        RoomCommand::VoteOnReconnection {
            participant_id,
            continue_without_player,
        } => disconnection_handlers::handle_vote(state, participant_id, continue_without_player).await,
        RoomCommand::WinnerAudioComplete { participant_id } => {
            game_handlers::handle_winner_audio_complete(state, Some(participant_id)).await
        }
        RoomCommand::RequestJudgingPlayback { participant_id } => {
            viewer_handlers::handle_request_judging_playback(state, participant_id).await
        }
        RoomCommand::RestartGame { participant_id } => game_handlers::handle_restart_game(state, participant_id).await,
        RoomCommand::RequestNextSubmission { viewer_id } => {
            viewer_handlers::handle_request_next_submission(state, viewer_id).await
        }
        RoomCommand::RequestMainScreenUpdate { viewer_id } => {
            viewer_handlers::handle_request_main_screen_update(state, viewer_id).await
        }
        RoomCommand::TimerExpired { kind, generation } => {
            if generation != state.timers.current_generation() {
                return;
            }
            handle_timer_expired(state, kind).await;
        }
        RoomCommand::TimerTick {
            kind,
            generation,
            seconds_remaining,
        } => {
            if generation != state.timers.current_generation() {
                return;
            }
            handle_timer_tick(state, kind, seconds_remaining).await;
        }
        RoomCommand::MaintenanceTick => run_maintenance(state).await,
    }
}

async fn handle_timer_expired(state: &mut RoomActorState, kind: TimerKind) {
    match kind {
        TimerKind::JudgeSelectionAutoAdvance => game_handlers::advance_to_prompt_selection(state).await,
        TimerKind::PromptSelectionTimeout => game_handlers::auto_select_prompt(state).await,
        TimerKind::SoundSelectionTimeout => game_handlers::auto_complete_sound_selection(state).await,
        TimerKind::PostPlaybackDelay => game_handlers::advance_to_judging(state).await,
        TimerKind::PostWinCelebration => game_handlers::resolve_post_win_celebration(state).await,
        TimerKind::AutoWinnerAudio => game_handlers::handle_winner_audio_complete(state, None).await,
        TimerKind::DisconnectionGrace => disconnection_handlers::handle_grace_expired(state).await,
        TimerKind::ReconnectionVote => disconnection_handlers::handle_vote_expired(state).await,
    }
}

async fn handle_timer_tick(state: &mut RoomActorState, kind: TimerKind, seconds_remaining: u32) {
    match kind {
        TimerKind::PromptSelectionTimeout | TimerKind::SoundSelectionTimeout => {
            state.broadcast(ServerMessage::TimeUpdate { seconds_remaining }).await;
        }
        TimerKind::ReconnectionVote => {
            state
                .broadcast(ServerMessage::ReconnectionVoteUpdate {
                    time_left_seconds: seconds_remaining,
                })
                .await;
        }
        _ => {}
    }
}

/// Prune stale disconnected-participant records and destroy rooms that
/// have been empty past the configured timeout (§4.10, §9 "sweep the
/// disconnected list").
async fn run_maintenance(state: &mut RoomActorState) {
    const DISCONNECTED_RECORD_TTL: chrono::Duration = chrono::Duration::minutes(5);
    let now = Utc::now();
    state
        .room
        .disconnected
        .retain(|d| now.signed_duration_since(d.disconnected_at) < DISCONNECTED_RECORD_TTL);

    let idle_for = state
        .became_empty_at
        .map(|since| now.signed_duration_since(since).num_seconds());

    if let Some(idle_seconds) = idle_for {
        if idle_seconds >= 0 && idle_seconds as u64 >= state.empty_room_timeout_secs {
            state.broadcast(ServerMessage::RoomClosed { room_code: state.code.clone() }).await;
            state.store.remove(&state.code);
            info!(room = %state.code, "room idle past timeout, removed from store");
        }
    }
}
