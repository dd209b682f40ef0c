//! Handlers for the three-phase disconnection protocol once a room is
//! `PAUSED_FOR_DISCONNECTION`: grace period, reconnection vote, and the
//! vote's resolution (§4.6).

use std::time::Duration;

use chrono::Utc;

use crate::disconnection::controller;
use crate::game::phase::GamePhase;
use crate::game::room::ReconnectionVote;
use crate::protocol::messages::ServerMessage;
use crate::protocol::types::ParticipantId;

use super::room_actor::RoomActorState;
use super::room_service::resume_from_pause;
use super::timers::TimerKind;

/// The grace period elapsed with nobody reconnecting: ask a random active
/// participant whether to continue without the disconnected player(s)
/// (§4.6 Phase B).
pub async fn handle_grace_expired(state: &mut RoomActorState) {
    if state.room.phase != GamePhase::PausedForDisconnection || state.room.disconnected.is_empty() {
        return;
    }

    let active = state.active_participant_ids();
    let Some(voter_id) = controller::pick_voter(&active) else {
        // Nobody left active to ask; the room can't continue.
        state
            .broadcast(ServerMessage::RoomClosed {
                room_code: state.code.clone(),
            })
            .await;
        state.store.remove(&state.code);
        return;
    };

    let disconnected_name = state
        .room
        .disconnected
        .first()
        .map(|d| d.name.clone())
        .unwrap_or_default();

    state.room.reconnection_vote = Some(ReconnectionVote {
        voter_id,
        disconnected_name: disconnected_name.clone(),
        started_at: Utc::now(),
    });

    state
        .connections
        .send_to_participant(
            voter_id,
            ServerMessage::ReconnectionVoteRequest(crate::protocol::messages::ReconnectionVoteRequestPayload {
                disconnected_name,
                time_left_seconds: state.config.reconnection_vote_secs as u32,
            }),
        )
        .await;

    state
        .timers
        .start_with_countdown(TimerKind::ReconnectionVote, Duration::from_secs(state.config.reconnection_vote_secs));
}

pub async fn handle_vote(state: &mut RoomActorState, caller: ParticipantId, continue_without_player: bool) {
    let Some(vote) = &state.room.reconnection_vote else {
        return;
    };
    if vote.voter_id != caller {
        return;
    }
    apply_vote(state, continue_without_player).await;
}

/// Nobody answered in time: default to "continue" (§4.6 Phase B).
pub async fn handle_vote_expired(state: &mut RoomActorState) {
    if state.room.reconnection_vote.is_none() {
        return;
    }
    apply_vote(state, true).await;
}

async fn apply_vote(state: &mut RoomActorState, continue_without_player: bool) {
    state.timers.cancel();
    state.room.reconnection_vote = None;

    state
        .broadcast(ServerMessage::ReconnectionVoteResult { continued_without_player: continue_without_player })
        .await;

    if continue_without_player {
        state.room.disconnected.clear();
        resume_from_pause(state).await;
    } else {
        state
            .timers
            .start(TimerKind::DisconnectionGrace, Duration::from_secs(state.config.reconnection_grace_secs));
    }
}
