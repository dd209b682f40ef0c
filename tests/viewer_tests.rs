//! Exercises passive-viewer join, primary-viewer election, and the
//! `requestMainScreenUpdate` cue (§4.7).

mod test_helpers;

use echofest_server::protocol::messages::{AppearanceRequest, ServerMessage};
use echofest_server::server::room_actor::RoomCommand;
use echofest_server::server::{JoinOutcome, ViewerJoinOutcome};
use test_helpers::{create_test_server, recv, recv_until};
use tokio::sync::mpsc;

#[tokio::test]
async fn first_viewer_becomes_primary_and_is_promoted_after_the_primary_leaves() {
    let server = create_test_server();

    let (tx, mut host_rx) = mpsc::channel(64);
    let JoinOutcome::Success { snapshot, .. } = server
        .create_room("Alice".to_string(), AppearanceRequest::default(), tx)
        .await
    else {
        panic!("expected room creation to succeed");
    };
    let room_code = snapshot.room_code.clone();

    let (viewer_a_tx, _viewer_a_rx) = mpsc::channel(64);
    let ViewerJoinOutcome::Success {
        viewer_id: viewer_a_id,
        snapshot,
    } = server
        .join_as_viewer(&room_code, Some("Display A".to_string()), viewer_a_tx)
        .await
    else {
        panic!("expected viewer A to join");
    };
    assert_eq!(snapshot.viewer_count, 1);
    assert_eq!(snapshot.primary_viewer_id, Some(viewer_a_id));

    let (viewer_b_tx, _viewer_b_rx) = mpsc::channel(64);
    let ViewerJoinOutcome::Success { viewer_id: viewer_b_id, .. } = server
        .join_as_viewer(&room_code, Some("Display B".to_string()), viewer_b_tx)
        .await
    else {
        panic!("expected viewer B to join");
    };

    // Both viewer joins broadcast a fresh snapshot to the room; the host
    // sees viewer_count climb to 2 while primary stays viewer A.
    let update = recv_until(&mut host_rx, |m| {
        matches!(m, ServerMessage::RoomUpdated(s) if s.viewer_count == 2)
    })
    .await;
    let ServerMessage::RoomUpdated(snapshot) = update else {
        unreachable!()
    };
    assert_eq!(snapshot.primary_viewer_id, Some(viewer_a_id));

    let handle = server.rooms.get(&room_code).expect("room should be live");
    handle.send(RoomCommand::ViewerLeave { viewer_id: viewer_a_id }).await;

    let after_departure = recv_until(&mut host_rx, |m| {
        matches!(m, ServerMessage::RoomUpdated(s) if s.viewer_count == 1)
    })
    .await;
    let ServerMessage::RoomUpdated(snapshot) = after_departure else {
        unreachable!()
    };
    assert_eq!(snapshot.primary_viewer_id, Some(viewer_b_id));
}

#[tokio::test]
async fn main_screen_update_sends_a_full_snapshot_to_the_requesting_viewer() {
    let server = create_test_server();

    let (tx, _host_rx) = mpsc::channel(64);
    let JoinOutcome::Success { snapshot, .. } = server
        .create_room("Alice".to_string(), AppearanceRequest::default(), tx)
        .await
    else {
        panic!("expected room creation to succeed");
    };
    let room_code = snapshot.room_code.clone();

    let (viewer_tx, mut viewer_rx) = mpsc::channel(64);
    let ViewerJoinOutcome::Success { viewer_id, .. } = server
        .join_as_viewer(&room_code, None, viewer_tx)
        .await
    else {
        panic!("expected viewer to join");
    };

    let handle = server.rooms.get(&room_code).expect("room should be live");
    handle
        .send(RoomCommand::RequestMainScreenUpdate { viewer_id })
        .await;

    let message = recv(&mut viewer_rx).await;
    match message {
        ServerMessage::MainScreenUpdate(snapshot) => {
            assert_eq!(snapshot.room_code, room_code);
        }
        other => panic!("expected MainScreenUpdate, got {other:?}"),
    }
}
