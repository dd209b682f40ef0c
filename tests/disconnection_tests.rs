//! Exercises the three-phase disconnection protocol (§4.6): a mid-round
//! departure pauses the room, the grace period expiring prompts a random
//! active participant for a reconnection vote, and voting to continue
//! resumes the room without the departed player.

mod test_helpers;

use echofest_server::game::phase::GamePhase;
use echofest_server::protocol::messages::{AppearanceRequest, ServerMessage};
use echofest_server::protocol::types::ParticipantId;
use echofest_server::server::room_actor::RoomCommand;
use echofest_server::server::JoinOutcome;
use test_helpers::{create_test_server, recv_until};
use tokio::sync::mpsc;

#[tokio::test]
async fn grace_expiry_prompts_a_vote_that_resumes_the_room_without_the_departed_player() {
    let server = create_test_server();

    let (tx, mut host_rx) = mpsc::channel(64);
    let JoinOutcome::Success {
        participant_id: host_id,
        snapshot,
    } = server
        .create_room("Alice".to_string(), AppearanceRequest::default(), tx)
        .await
    else {
        panic!("expected room creation to succeed");
    };
    let room_code = snapshot.room_code.clone();

    let (bob_tx, mut bob_rx) = mpsc::channel(64);
    let JoinOutcome::Success { participant_id: bob_id, .. } = server
        .join_room(&room_code, "Bob".to_string(), AppearanceRequest::default(), bob_tx)
        .await
    else {
        panic!("expected bob to join");
    };

    let (carol_tx, carol_rx) = mpsc::channel(64);
    let JoinOutcome::Success { participant_id: carol_id, .. } = server
        .join_room(&room_code, "Carol".to_string(), AppearanceRequest::default(), carol_tx)
        .await
    else {
        panic!("expected carol to join");
    };

    let handle = server.rooms.get(&room_code).expect("room should be live");
    handle.send(RoomCommand::StartGame { participant_id: host_id }).await;

    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::JudgeSelected { .. })).await;
    drop(carol_rx); // carol departs below; her outbox receives nothing further.

    // Carol departs, whether or not she's the judge (judge replacement on
    // resume is exercised implicitly if she was). Host and Bob always
    // remain, so the reconnection vote always lands on one of those two.
    handle.send(RoomCommand::Disconnected { participant_id: carol_id }).await;

    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::GamePausedForDisconnection { .. })).await;

    // The grace timer expires on its own and sends a vote request to exactly
    // one of the two remaining active participants; race both outboxes for
    // whichever one it lands on.
    let voter_id = race_for_vote_request(host_id, &mut host_rx, bob_id, &mut bob_rx).await;

    handle
        .send(RoomCommand::VoteOnReconnection {
            participant_id: voter_id,
            continue_without_player: true,
        })
        .await;

    recv_until(&mut host_rx, |m| matches!(m, ServerMessage::ReconnectionVoteResult { .. })).await;
    let resumed = recv_until(&mut host_rx, |m| matches!(m, ServerMessage::GameResumed { .. })).await;
    let ServerMessage::GameResumed { resumed_phase } = resumed else {
        unreachable!()
    };
    assert_eq!(resumed_phase, GamePhase::JudgeSelection);
}

/// Both remaining participants race to receive `ReconnectionVoteRequest`;
/// exactly one of them should, since `pick_voter` chooses uniformly from the
/// active (non-departed) participant list.
async fn race_for_vote_request(
    host_id: ParticipantId,
    host_rx: &mut mpsc::Receiver<ServerMessage>,
    bob_id: ParticipantId,
    bob_rx: &mut mpsc::Receiver<ServerMessage>,
) -> ParticipantId {
    loop {
        tokio::select! {
            message = host_rx.recv() => {
                if let Some(ServerMessage::ReconnectionVoteRequest(_)) = message {
                    return host_id;
                }
            }
            message = bob_rx.recv() => {
                if let Some(ServerMessage::ReconnectionVoteRequest(_)) = message {
                    return bob_id;
                }
            }
            () = tokio::time::sleep(std::time::Duration::from_secs(5)) => {
                panic!("timed out waiting for a reconnection vote request");
            }
        }
    }
}
