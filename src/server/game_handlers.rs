//! Handlers for the core round loop: judge selection through round results
//! (§4.2, §4.3, §4.4).

use std::time::Duration;

use crate::game::phase::GamePhase;
use crate::game::room::{prompt_summary, submission_summary};
use crate::game::scoring::{evaluate_round_outcome, RoundOutcome};
use crate::game::shuffle::{build_seed, deterministic_shuffle};
use crate::game::state_machine::{
    auto_generate_submission, validate_restart_game, validate_select_prompt, validate_select_winner,
    validate_start_game, validate_submit_sounds, validate_update_settings,
};
use crate::protocol::messages::{
    GameCompletePayload, GameSettings, GameStateChangedPayload, RoundCompletePayload, ServerMessage,
    TieBreakerPayload,
};
use crate::protocol::types::{ParticipantId, PromptId, SoundId, PROMPT_CHOICE_COUNT, SOUND_SET_SIZE};
use crate::protocol::validation::{parse_winner_index, validate_game_settings, validate_submission};

use super::room_actor::RoomActorState;
use super::timers::TimerKind;

pub async fn handle_start_game(state: &mut RoomActorState, caller: ParticipantId) {
    if let Err(code) = validate_start_game(&state.room, caller, state.config.min_participants) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    state.room.current_round = 1;
    begin_judge_selection(state).await;
}

pub async fn handle_update_settings(state: &mut RoomActorState, caller: ParticipantId, settings: GameSettings) {
    if let Err(code) = validate_update_settings(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    if let Err(error) = validate_game_settings(settings.max_rounds, settings.max_score, &state.config) {
        state.send_error(caller, error.code, error.message).await;
        return;
    }
    state.room.max_rounds = settings.max_rounds;
    state.room.max_score = settings.max_score;
    state.room.allow_explicit_content = settings.allow_explicit_content;
    state.broadcast(ServerMessage::GameSettingsUpdated(settings)).await;
    state.broadcast_snapshot().await;
}

pub async fn handle_restart_game(state: &mut RoomActorState, caller: ParticipantId) {
    if let Err(code) = validate_restart_game(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    state.timers.cancel();
    state.room.clear_round_state();
    state.room.current_round = 0;
    state.room.overall_winner = None;
    state.room.last_winner = None;
    state.room.last_winning_submission = None;
    state.room.used_prompt_ids.clear();
    state.room.current_prompt = None;
    state.room.available_prompts.clear();
    state.room.judge_id = None;
    for participant in &mut state.room.participants {
        participant.score = 0;
    }
    state.room.phase = GamePhase::Lobby;
    state.broadcast_snapshot().await;
}

/// Begin (or restart, for a new round) the `JUDGE_SELECTION` phase (§4.2).
pub async fn begin_judge_selection(state: &mut RoomActorState) {
    state.room.rotate_judge();
    state.room.phase = GamePhase::JudgeSelection;
    state.room.judge_selection_timer_started = true;

    let judge_id = state.room.judge_id;
    if let Some(judge_id) = judge_id {
        state.broadcast(ServerMessage::JudgeSelected { judge_id }).await;
    }
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: GamePhase::JudgeSelection,
            judge_id,
            available_prompts: None,
            prompt: None,
            time_limit_seconds: Some(state.config.judge_selection_secs as u32),
            submissions: None,
            randomized_submissions: None,
            current_round: state.room.current_round,
        })))
        .await;
    state.broadcast_snapshot().await;

    state
        .timers
        .start(TimerKind::JudgeSelectionAutoAdvance, Duration::from_secs(state.config.judge_selection_secs));
}

pub async fn advance_to_prompt_selection(state: &mut RoomActorState) {
    if state.room.phase != GamePhase::JudgeSelection {
        return;
    }
    state.room.judge_selection_timer_started = false;

    let prompts = state
        .catalog
        .sample_prompts(PROMPT_CHOICE_COUNT, &state.room.used_prompt_ids, state.room.allow_explicit_content)
        .await;
    state.room.available_prompts = prompts;
    state.room.phase = GamePhase::PromptSelection;

    let summaries = state.room.available_prompts.iter().map(prompt_summary).collect::<Vec<_>>();
    let judge_id = state.room.judge_id;
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: GamePhase::PromptSelection,
            judge_id,
            available_prompts: Some(summaries),
            prompt: None,
            time_limit_seconds: Some(state.config.prompt_selection_secs as u32),
            submissions: None,
            randomized_submissions: None,
            current_round: state.room.current_round,
        })))
        .await;
    state.broadcast_snapshot().await;

    state
        .timers
        .start_with_countdown(TimerKind::PromptSelectionTimeout, Duration::from_secs(state.config.prompt_selection_secs));
}

pub async fn handle_select_prompt(state: &mut RoomActorState, caller: ParticipantId, prompt_id: PromptId) {
    if let Err(code) = validate_select_prompt(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    let Some(prompt) = state.room.available_prompts.iter().find(|p| p.id == prompt_id).cloned() else {
        state
            .send_error(caller, crate::protocol::ErrorCode::InvalidInput, "Unknown prompt id")
            .await;
        return;
    };
    apply_prompt_selection(state, prompt).await;
}

pub async fn auto_select_prompt(state: &mut RoomActorState) {
    if state.room.phase != GamePhase::PromptSelection {
        return;
    }
    let Some(prompt) = state.room.available_prompts.first().cloned() else {
        return;
    };
    apply_prompt_selection(state, prompt).await;
}

async fn apply_prompt_selection(state: &mut RoomActorState, prompt: crate::assets::Prompt) {
    state.room.used_prompt_ids.insert(prompt.id.clone());
    state.room.current_prompt = Some(prompt.clone());
    state.room.available_prompts.clear();

    let judge_id = state.room.judge_id;
    for participant in state.room.participants.iter_mut().filter(|p| Some(p.id) != judge_id) {
        let sounds = state
            .catalog
            .sample_sounds(SOUND_SET_SIZE, None, state.room.allow_explicit_content)
            .await;
        participant.sound_set = sounds.into_iter().map(|s| s.id).collect();
    }

    state.room.phase = GamePhase::SoundSelection;
    let summary = prompt_summary(&prompt);
    state.broadcast(ServerMessage::PromptSelected { prompt: summary.clone() }).await;
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: GamePhase::SoundSelection,
            judge_id,
            available_prompts: None,
            prompt: Some(summary),
            time_limit_seconds: None,
            submissions: None,
            randomized_submissions: None,
            current_round: state.room.current_round,
        })))
        .await;
    state.broadcast_snapshot().await;
}

pub async fn handle_submit_sounds(state: &mut RoomActorState, caller: ParticipantId, sound_ids: Vec<SoundId>) {
    if let Err(code) = validate_submit_sounds(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    if let Err(error) = validate_submission(&sound_ids) {
        state.send_error(caller, error.code, error.message).await;
        return;
    }
    let Some(participant) = state.room.find_participant(caller) else {
        return;
    };
    let display_name = participant.name.clone();
    state.room.submissions.push(crate::game::submission::Submission {
        participant_id: caller,
        display_name,
        sound_ids,
    });

    state.broadcast(ServerMessage::SoundSubmitted { participant_id: caller }).await;

    if state.room.submissions.len() == 1 && !state.room.sound_selection_timer_started {
        state.room.sound_selection_timer_started = true;
        state
            .timers
            .start_with_countdown(TimerKind::SoundSelectionTimeout, Duration::from_secs(state.config.sound_selection_secs));
    }

    if state.room.all_non_judges_submitted() {
        state.timers.cancel();
        begin_playback(state).await;
    }
}

pub async fn auto_complete_sound_selection(state: &mut RoomActorState) {
    if state.room.phase != GamePhase::SoundSelection {
        return;
    }
    let judge_id = state.room.judge_id;
    let already_submitted: std::collections::HashSet<ParticipantId> =
        state.room.submissions.iter().map(|s| s.participant_id).collect();

    let pending: Vec<(ParticipantId, String, Vec<SoundId>)> = state
        .room
        .participants
        .iter()
        .filter(|p| Some(p.id) != judge_id && !already_submitted.contains(&p.id))
        .map(|p| (p.id, p.name.clone(), p.sound_set.clone()))
        .collect();

    for (participant_id, display_name, sound_set) in pending {
        let sound_ids = auto_generate_submission(&sound_set);
        state.room.submissions.push(crate::game::submission::Submission {
            participant_id,
            display_name,
            sound_ids,
        });
        state.broadcast(ServerMessage::SoundSubmitted { participant_id }).await;
    }

    begin_playback(state).await;
}

pub async fn begin_playback(state: &mut RoomActorState) {
    let seed = build_seed(&state.room.code, state.room.current_round, chrono::Utc::now().timestamp_millis());
    state.room.randomized_submissions = deterministic_shuffle(&state.room.submissions, &seed);
    state.room.shuffle_seed = Some(seed);
    state.room.current_submission_index = 0;
    state.room.phase = GamePhase::Playback;

    let summaries = state.room.randomized_submissions.iter().map(submission_summary).collect::<Vec<_>>();
    let judge_id = state.room.judge_id;
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: GamePhase::Playback,
            judge_id,
            available_prompts: None,
            prompt: None,
            time_limit_seconds: None,
            submissions: None,
            randomized_submissions: Some(summaries),
            current_round: state.room.current_round,
        })))
        .await;
    state.broadcast_snapshot().await;

    // Playback is driven entirely by the primary viewer's `requestNextSubmission`
    // calls starting from cursor 0 — nothing is emitted on entry.
    if state.viewers.primary().is_none() {
        // No viewer to drive playback cues; flush straight to judging
        // rather than stall on a human who isn't there (§9 "no-viewer"
        // fallback, mirrored from the celebration-audio auto-advance).
        advance_to_judging(state).await;
    }
}

pub async fn advance_to_judging(state: &mut RoomActorState) {
    if state.room.phase == GamePhase::Playback {
        state.room.current_submission_index = 0;
    }
    state.room.phase = GamePhase::Judging;
    let summaries = state.room.randomized_submissions.iter().map(submission_summary).collect::<Vec<_>>();
    let judge_id = state.room.judge_id;
    state
        .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
            phase: GamePhase::Judging,
            judge_id,
            available_prompts: None,
            prompt: None,
            time_limit_seconds: None,
            submissions: Some(summaries),
            randomized_submissions: None,
            current_round: state.room.current_round,
        })))
        .await;
    state.broadcast_snapshot().await;
}

pub async fn handle_select_winner(state: &mut RoomActorState, caller: ParticipantId, index: String) {
    if let Err(code) = validate_select_winner(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    let index = match parse_winner_index(&index, state.room.randomized_submissions.len()) {
        Ok(index) => index,
        Err(error) => {
            state.send_error(caller, error.code, error.message).await;
            return;
        }
    };
    let winning = state.room.randomized_submissions[index].clone();
    if let Some(winner) = state.room.find_participant_mut(winning.participant_id) {
        winner.score += 1;
    }
    state.room.last_winner = Some(winning.participant_id);
    state.room.last_winning_submission = Some(winning.clone());
    state.room.phase = GamePhase::RoundResults;

    let scores: Vec<(ParticipantId, u32)> = state.room.participants.iter().map(|p| (p.id, p.score)).collect();
    let winner_name = winning.display_name.clone();
    state
        .broadcast(ServerMessage::RoundComplete(RoundCompletePayload {
            winner_id: winning.participant_id,
            winner_name,
            winning_sound_ids: winning.sound_ids.clone(),
            scores,
        }))
        .await;
    state.broadcast_snapshot().await;

    state.pending_round_outcome = Some(evaluate_round_outcome(&state.room));
    state.awaiting_winner_audio = true;

    if state.viewers.is_empty() {
        state
            .timers
            .start(TimerKind::AutoWinnerAudio, Duration::from_secs(state.config.auto_winner_audio_delay_secs));
    }
}

pub async fn handle_winner_audio_complete(state: &mut RoomActorState, caller: Option<ParticipantId>) {
    let _ = caller;
    if !state.awaiting_winner_audio {
        return;
    }
    state.awaiting_winner_audio = false;

    if let Some(RoundOutcome::TieBreaker(tied)) = &state.pending_round_outcome {
        state
            .broadcast(ServerMessage::TieBreakerRound(TieBreakerPayload {
                tied_participant_ids: tied.clone(),
            }))
            .await;
    }

    state
        .timers
        .start(TimerKind::PostWinCelebration, Duration::from_secs(state.config.post_win_celebration_secs));
}

pub async fn resolve_post_win_celebration(state: &mut RoomActorState) {
    let outcome = state.pending_round_outcome.take().unwrap_or(RoundOutcome::Continue);
    match outcome {
        RoundOutcome::GameOver(winner_id) => {
            state.room.overall_winner = Some(winner_id);
            state.room.phase = GamePhase::GameOver;
            let final_scores: Vec<(ParticipantId, u32)> =
                state.room.participants.iter().map(|p| (p.id, p.score)).collect();
            state
                .broadcast(ServerMessage::GameComplete(GameCompletePayload {
                    winner_id,
                    final_scores,
                }))
                .await;
            state
                .broadcast(ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
                    phase: GamePhase::GameOver,
                    judge_id: state.room.judge_id,
                    available_prompts: None,
                    prompt: None,
                    time_limit_seconds: None,
                    submissions: None,
                    randomized_submissions: None,
                    current_round: state.room.current_round,
                })))
                .await;
            state.broadcast_snapshot().await;
        }
        RoundOutcome::Continue | RoundOutcome::TieBreaker(_) => {
            state.room.clear_round_state();
            state.room.current_round += 1;
            begin_judge_selection(state).await;
        }
    }
}
