//! Handlers for joining, leaving, and reconnecting to a room (§4.5, §4.6
//! "Lobby / game-over disconnection", GLOSSARY "Host").

use chrono::Utc;

use super::room_actor::{JoinOutcome, JoinRequest, ReconnectRequest, RoomActorState};
use super::timers::TimerKind;
use crate::disconnection::controller;
use crate::game::participant::{allocate_appearance, DisconnectedParticipant, Participant};
use crate::game::phase::GamePhase;
use crate::game::room::{prompt_summary, submission_summary};
use crate::protocol::messages::{GameStateChangedPayload, ServerMessage};
use crate::protocol::types::ParticipantId;
use crate::protocol::validation::validate_participant_name;
use crate::protocol::ErrorCode;

pub async fn handle_join(state: &mut RoomActorState, request: JoinRequest) {
    let JoinRequest {
        name,
        appearance,
        outbox,
        reply,
    } = request;

    if let Err(error) = validate_participant_name(&name) {
        let _ = reply.send(JoinOutcome::Failure {
            reason: error.message,
            error_code: error.code,
        });
        return;
    }
    let name = name.trim().to_string();

    if state.room.phase != GamePhase::Lobby {
        let _ = reply.send(JoinOutcome::Failure {
            reason: "This room has already started a game".into(),
            error_code: ErrorCode::WrongPhase,
        });
        return;
    }
    if state.room.participants.len() >= state.config.max_participants {
        let _ = reply.send(JoinOutcome::Failure {
            reason: "This room is full".into(),
            error_code: ErrorCode::RoomFull,
        });
        return;
    }
    if state.room.name_taken(&name) {
        let _ = reply.send(JoinOutcome::Failure {
            reason: "That name is already taken in this room".into(),
            error_code: ErrorCode::NameTaken,
        });
        return;
    }

    let taken: Vec<_> = state.room.participants.iter().map(|p| p.appearance).collect();
    let allocated = allocate_appearance(&taken, &appearance);
    let participant = Participant::new(ParticipantId::new_v4(), name.clone(), allocated, false);
    let participant_id = participant.id;
    state.room.add_participant(participant);
    state.connections.register_participant(participant_id, outbox);

    let snapshot = state.snapshot();
    let _ = reply.send(JoinOutcome::Success {
        participant_id,
        snapshot: snapshot.clone(),
    });

    state
        .broadcast(ServerMessage::PlayerJoined {
            participant_id,
            name,
        })
        .await;
    state.broadcast_snapshot().await;
}

pub async fn handle_reconnect(state: &mut RoomActorState, request: ReconnectRequest) {
    let ReconnectRequest {
        name,
        original_participant_id,
        outbox,
        reply,
    } = request;

    let Some(index) = state
        .room
        .disconnected
        .iter()
        .position(|d| d.original_participant_id == original_participant_id && d.name == name)
    else {
        let _ = reply.send(JoinOutcome::Failure {
            reason: "No matching disconnection record was found".into(),
            error_code: ErrorCode::ReconnectionFailed,
        });
        return;
    };

    let record = state.room.disconnected.remove(index);
    let was_judge = record.was_judge;
    let restored = record.restore();
    let participant_id = restored.id;
    state.room.participants.push(restored);
    if was_judge {
        state.room.judge_id = Some(participant_id);
    }
    state.connections.register_participant(participant_id, outbox);

    state
        .broadcast(ServerMessage::PlayerReconnected { participant_id })
        .await;

    if state.room.disconnected.is_empty() && state.room.phase == GamePhase::PausedForDisconnection {
        resume_from_pause(state).await;
    }

    let snapshot = state.snapshot();
    let _ = reply.send(JoinOutcome::Success {
        participant_id,
        snapshot,
    });
    state.broadcast_snapshot().await;
}

pub async fn handle_leave(state: &mut RoomActorState, participant_id: ParticipantId) {
    handle_departure(state, participant_id).await;
}

pub async fn handle_disconnected(state: &mut RoomActorState, participant_id: ParticipantId) {
    handle_departure(state, participant_id).await;
}

/// Voluntary leave and transport disconnect are treated identically: in
/// `LOBBY`/`GAME_OVER` the participant is removed outright, otherwise the
/// room pauses for the three-phase disconnection protocol (§4.6).
async fn handle_departure(state: &mut RoomActorState, participant_id: ParticipantId) {
    state.connections.unregister_participant(participant_id);

    if matches!(state.room.phase, GamePhase::Lobby | GamePhase::GameOver) {
        if state.room.remove_participant(participant_id).is_some() {
            state.broadcast(ServerMessage::PlayerLeft { participant_id }).await;
            state.broadcast_snapshot().await;
        }
        return;
    }

    if state.room.phase == GamePhase::PausedForDisconnection {
        // Another participant vanished while the room was already paused;
        // fold them into the pending disconnection without restarting the
        // grace timer (it is already running for the first departure).
        snapshot_departure(state, participant_id);
        state.broadcast_snapshot().await;
        return;
    }

    let was_judge = state.room.is_judge(participant_id);
    let Some(name) = snapshot_departure(state, participant_id) else {
        return;
    };

    state.room.previous_phase = Some(state.room.phase);
    state.room.phase = GamePhase::PausedForDisconnection;
    state.room.disconnection_started_at = Some(Utc::now());
    let _ = was_judge;

    state
        .broadcast(ServerMessage::PlayerDisconnected {
            participant_id,
            name: name.clone(),
        })
        .await;
    state
        .broadcast(ServerMessage::GamePausedForDisconnection { disconnected_name: name })
        .await;
    state.broadcast_snapshot().await;

    state
        .timers
        .start(TimerKind::DisconnectionGrace, std::time::Duration::from_secs(state.config.reconnection_grace_secs));
}

/// Move a participant from the active list into the disconnected list,
/// returning their display name, or `None` if they were already gone.
fn snapshot_departure(state: &mut RoomActorState, participant_id: ParticipantId) -> Option<String> {
    let was_judge = state.room.is_judge(participant_id);
    let participant = state.room.remove_participant(participant_id)?;
    let name = participant.name.clone();
    state
        .room
        .disconnected
        .push(DisconnectedParticipant::snapshot(&participant, was_judge, Utc::now()));
    Some(name)
}

/// Resume a paused room once every disconnected participant is accounted
/// for, either by reconnection or by a vote to continue without them
/// (§4.6 "Resumption").
pub async fn resume_from_pause(state: &mut RoomActorState) {
    state.timers.cancel();
    state.room.reconnection_vote = None;
    let resumed_phase = state.room.previous_phase.take().unwrap_or(GamePhase::Lobby);
    state.room.phase = resumed_phase;
    state.room.disconnection_started_at = None;

    if let Some(judge_id) = state.room.judge_id {
        if state.room.find_participant(judge_id).is_none() {
            if let Some(replacement) = controller::replacement_judge_if_needed(&state.room) {
                state.room.judge_id = Some(replacement);
            }
        }
    }

    state.broadcast(ServerMessage::GameResumed { resumed_phase }).await;

    let judge_id = state.room.judge_id;
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: resumed_phase,
            judge_id,
            available_prompts: if resumed_phase == GamePhase::PromptSelection {
                Some(state.room.available_prompts.iter().map(prompt_summary).collect())
            } else {
                None
            },
            prompt: state.room.current_prompt.as_ref().map(prompt_summary),
            time_limit_seconds: None,
            submissions: if resumed_phase == GamePhase::Judging {
                Some(state.room.randomized_submissions.iter().map(submission_summary).collect())
            } else {
                None
            },
            randomized_submissions: if resumed_phase == GamePhase::Playback {
                Some(state.room.randomized_submissions.iter().map(submission_summary).collect())
            } else {
                None
            },
            current_round: state.room.current_round,
        })))
        .await;

    match controller::resume_timer_action(&state.room, resumed_phase) {
        controller::ResumeTimerAction::RestartSoundSelection => {
            if state.room.all_non_judges_submitted() {
                super::game_handlers::begin_playback(state).await;
            } else {
                state.timers.start_with_countdown(
                    TimerKind::SoundSelectionTimeout,
                    std::time::Duration::from_secs(state.config.sound_selection_secs),
                );
            }
        }
        controller::ResumeTimerAction::RestartJudgeSelection => {
            state.room.judge_selection_timer_started = true;
            state
                .timers
                .start(TimerKind::JudgeSelectionAutoAdvance, std::time::Duration::from_secs(state.config.judge_selection_secs));
        }
        controller::ResumeTimerAction::None => {}
    }

    state.broadcast_snapshot().await;
}
