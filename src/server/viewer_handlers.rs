//! Handlers for viewer-origin events: joining as a passive display,
//! playback cues, and main-screen refresh requests (§4.7).

use std::time::Duration;

use crate::game::phase::GamePhase;
use crate::game::room::submission_summary;
use crate::protocol::messages::{GameStateChangedPayload, ServerMessage};
use crate::protocol::types::{ParticipantId, ViewerId};
use crate::protocol::ErrorCode;

use super::room_actor::{RoomActorState, ViewerJoinOutcome, ViewerJoinRequest};
use super::timers::TimerKind;

/// PLAYBACK -> JUDGING delay once the cursor reaches the submission count
/// (§5 "Timeouts"). Fixed by the spec rather than configurable — unlike the
/// other round timers, §9 does not list this one among the parameterizable
/// values.
const POST_PLAYBACK_DELAY: Duration = Duration::from_millis(2500);

pub async fn handle_join_as_viewer(state: &mut RoomActorState, request: ViewerJoinRequest) {
    let ViewerJoinRequest { outbox, reply, .. } = request;
    let viewer_id = ViewerId::new_v4();
    state.connections.register_viewer(viewer_id, outbox);
    state.viewers.join(viewer_id);

    let snapshot = state.snapshot();
    let _ = reply.send(ViewerJoinOutcome::Success {
        viewer_id,
        snapshot,
    });
    state.broadcast_snapshot().await;
}

pub async fn handle_viewer_leave(state: &mut RoomActorState, viewer_id: ViewerId) {
    state.connections.unregister_viewer(viewer_id);
    state.viewers.leave(viewer_id);
    state.broadcast_snapshot().await;
}

pub async fn handle_request_next_submission(state: &mut RoomActorState, viewer_id: ViewerId) {
    if state.room.phase != GamePhase::Playback {
        return;
    }
    if !state.viewers.is_primary(viewer_id) {
        state
            .connections
            .send_to_viewer(
                viewer_id,
                ServerMessage::Error {
                    message: ErrorCode::NotPrimaryViewer.description().to_string(),
                    error_code: ErrorCode::NotPrimaryViewer,
                },
            )
            .await;
        return;
    }

    let index = state.room.current_submission_index;

    if let Some(submission) = state.room.randomized_submissions.get(index) {
        state
            .broadcast(ServerMessage::PlaySubmission {
                submission: submission_summary(submission),
                index,
            })
            .await;
        state.room.current_submission_index += 1;
    } else {
        state.timers.start(TimerKind::PostPlaybackDelay, POST_PLAYBACK_DELAY);
    }
}

/// The judge may ask to review a submission during `JUDGING`; each call
/// advances a review cursor through the randomized order so repeated
/// requests step through every clip (§6 `requestJudgingPlayback`).
pub async fn handle_request_judging_playback(state: &mut RoomActorState, caller: ParticipantId) {
    if let Err(code) = crate::game::state_machine::validate_request_judging_playback(&state.room, caller) {
        state.send_error(caller, code, code.description()).await;
        return;
    }
    let Some(primary) = state.viewers.primary() else {
        return;
    };
    let Some(submission) = state
        .room
        .randomized_submissions
        .get(state.room.current_submission_index)
    else {
        return;
    };
    state
        .connections
        .send_to_viewer(
            primary,
            ServerMessage::PlayJudgingSubmission {
                submission: submission_summary(submission),
            },
        )
        .await;
    state.room.current_submission_index =
        (state.room.current_submission_index + 1) % state.room.randomized_submissions.len().max(1);
}

pub async fn handle_request_main_screen_update(state: &mut RoomActorState, viewer_id: ViewerId) {
    let snapshot = state.snapshot();
    state
        .connections
        .send_to_viewer(viewer_id, ServerMessage::MainScreenUpdate(Box::new(snapshot)))
        .await;

    if state.room.phase == GamePhase::SoundSelection || state.room.phase == GamePhase::PromptSelection {
        let judge_id = state.room.judge_id;
        state
            .connections
            .send_to_viewer(
                viewer_id,
                ServerMessage::GameStateChanged(Box::new(GameStateChangedPayload {
                    phase: state.room.phase,
                    judge_id,
                    available_prompts: None,
                    prompt: state.room.current_prompt.as_ref().map(crate::game::room::prompt_summary),
                    time_limit_seconds: None,
                    submissions: None,
                    randomized_submissions: None,
                    current_round: state.room.current_round,
                })),
            )
            .await;
    }
}
