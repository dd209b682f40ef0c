//! Drives a full room lifecycle end to end: lobby join, the judge-selection
//! through round-results loop advancing entirely on its own timers, and the
//! game-over transition once the score limit is reached (§4.2-§4.4).

mod test_helpers;

use echofest_server::protocol::messages::{AppearanceRequest, GameSettings, ServerMessage};
use echofest_server::protocol::types::ParticipantId;
use echofest_server::server::room_actor::RoomCommand;
use echofest_server::server::{GameServer, JoinOutcome};
use echofest_server::game::phase::GamePhase;
use test_helpers::{create_test_server, recv, recv_until};
use tokio::sync::mpsc;

struct Player {
    id: ParticipantId,
    rx: mpsc::Receiver<ServerMessage>,
}

async fn join(server: &GameServer, room_code: &str, name: &str) -> Player {
    let (tx, rx) = mpsc::channel(64);
    let outcome = server
        .join_room(room_code, name.to_string(), AppearanceRequest::default(), tx)
        .await;
    let JoinOutcome::Success { participant_id, .. } = outcome else {
        panic!("expected {name} to join {room_code} successfully");
    };
    Player { id: participant_id, rx }
}

fn is_phase(message: &ServerMessage, phase: GamePhase) -> bool {
    matches!(message, ServerMessage::GameStateChanged(payload) if payload.phase == phase)
}

#[tokio::test]
async fn full_round_advances_through_every_phase_to_game_over() {
    let server = create_test_server();

    let (tx, mut host_rx) = mpsc::channel(64);
    let outcome = server
        .create_room("Alice".to_string(), AppearanceRequest::default(), tx)
        .await;
    let JoinOutcome::Success {
        participant_id: host_id,
        snapshot,
    } = outcome
    else {
        panic!("expected room creation to succeed");
    };
    let room_code = snapshot.room_code.clone();

    let mut bob = join(&server, &room_code, "Bob").await;
    let mut carol = join(&server, &room_code, "Carol").await;

    let handle = server.rooms.get(&room_code).expect("room should be live");

    // Tighten the game to one round at one point so the very first winner
    // ends the game, without waiting through several round-results cycles.
    handle
        .send(RoomCommand::UpdateGameSettings {
            participant_id: host_id,
            settings: GameSettings {
                max_rounds: 1,
                max_score: 1,
                allow_explicit_content: true,
            },
        })
        .await;
    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::GameSettingsUpdated(_))).await;

    handle.send(RoomCommand::StartGame { participant_id: host_id }).await;

    let judge_selected = recv_until(&mut host_rx, |m| matches!(m, ServerMessage::JudgeSelected { .. })).await;
    let ServerMessage::JudgeSelected { judge_id } = judge_selected else {
        unreachable!()
    };

    // Judge selection auto-advances into prompt selection on its own timer.
    recv_until(&mut host_rx, |m| is_phase(m, GamePhase::PromptSelection)).await;

    // Nobody selects a prompt; the timeout auto-picks the first available
    // one and moves the room into sound selection.
    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::PromptSelected { .. })).await;
    recv_until(&mut host_rx, |m| is_phase(m, GamePhase::SoundSelection)).await;

    let non_judges: Vec<&mut Player> = [&mut bob, &mut carol]
        .into_iter()
        .filter(|p| p.id != judge_id)
        .collect();
    assert_eq!(non_judges.len(), 2, "exactly one of bob/carol should be judge");

    // Submit sounds are validated only on shape, not on membership in the
    // assigned sound set (see `validate_submission`), which is never exposed
    // to callers outside the room actor. One non-judge submits explicitly...
    let submitter_id = non_judges[0].id;
    handle
        .send(RoomCommand::SubmitSounds {
            participant_id: submitter_id,
            sound_ids: vec!["whatever-id".to_string()],
        })
        .await;
    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::SoundSubmitted { .. })).await;

    // ...the other is left to the sound-selection timeout's auto-generated
    // submission, which also drives the room into playback/judging.
    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::SoundSubmitted { .. })).await;

    // No viewer is connected, so playback falls straight through to judging.
    let judging = recv_until(&mut host_rx, |m| is_phase(m, GamePhase::Judging)).await;
    let ServerMessage::GameStateChanged(payload) = judging else {
        unreachable!()
    };
    let submission_count = payload.submissions.as_ref().map(Vec::len).unwrap_or(0);
    assert_eq!(submission_count, 2, "both non-judges should have a submission");

    handle
        .send(RoomCommand::SelectWinner {
            participant_id: judge_id,
            index: "0".to_string(),
        })
        .await;
    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::RoundComplete(_))).await;

    // No viewers means the server self-advances winner audio, then the
    // post-win celebration, straight into game-over since max_score is 1.
    let game_complete = recv_until(&mut host_rx, |m| matches!(m, ServerMessage::GameComplete(_))).await;
    let ServerMessage::GameComplete(payload) = game_complete else {
        unreachable!()
    };
    assert_eq!(payload.final_scores.iter().filter(|(_, score)| *score == 1).count(), 1);

    recv_until(&mut host_rx, |m| is_phase(m, GamePhase::GameOver)).await;

    // Confirm nobody else was left stranded: every other outbox eventually
    // sees the same game-over transition.
    recv_until(&mut bob.rx, |m| is_phase(m, GamePhase::GameOver)).await;
    recv_until(&mut carol.rx, |m| is_phase(m, GamePhase::GameOver)).await;
}

#[tokio::test]
async fn host_only_may_start_the_game() {
    let server = create_test_server();

    let (tx, _host_rx) = mpsc::channel(64);
    let JoinOutcome::Success { snapshot, .. } = server
        .create_room("Alice".to_string(), AppearanceRequest::default(), tx)
        .await
    else {
        panic!("expected room creation to succeed");
    };
    let room_code = snapshot.room_code.clone();
    let mut bob = join(&server, &room_code, "Bob").await;
    let _carol = join(&server, &room_code, "Carol").await;

    let handle = server.rooms.get(&room_code).expect("room should be live");
    handle.send(RoomCommand::StartGame { participant_id: bob.id }).await;

    let error = recv(&mut bob.rx).await;
    match error {
        ServerMessage::Error { error_code, .. } => {
            assert_eq!(error_code, echofest_server::protocol::ErrorCode::NotHost);
        }
        other => panic!("expected a NotHost error, got {other:?}"),
    }
}
