//! Per-connection receive loop: deserializes inbound frames, tracks whether
//! this connection has bound to a participant or a viewer, and dispatches
//! each message to the `GameServer`/room actor (§4.8, §4.9).

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::protocol::messages::{ClientMessage, ServerMessage};
use crate::protocol::types::{ParticipantId, ViewerId};
use crate::protocol::validation::{
    validate_participant_name, validate_room_code, validate_submission,
};
use crate::protocol::ErrorCode;
use crate::server::room_actor::RoomCommand;
use crate::server::{GameServer, JoinOutcome, ViewerJoinOutcome};

/// What this connection has bound itself to so far. A connection starts
/// unbound and becomes exactly one of the other two on its first successful
/// join/create/reconnect.
enum Binding {
    Unbound,
    Participant {
        room_code: String,
        participant_id: ParticipantId,
    },
    Viewer {
        room_code: String,
        viewer_id: ViewerId,
    },
}

pub async fn handle_socket(socket: WebSocket, server: Arc<GameServer>) {
    let (sink, mut receiver) = socket.split();
    let (outbox, outbox_rx) = mpsc::channel::<ServerMessage>(64);

    let send_task = tokio::spawn(super::sending::run_send_loop(sink, outbox_rx));

    let mut binding = Binding::Unbound;

    while let Some(frame) = receiver.next().await {
        let message = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(err) => {
                warn!(error = %err, "websocket receive error");
                break;
            }
        };

        let client_message: ClientMessage = match serde_json::from_str(&message) {
            Ok(msg) => msg,
            Err(err) => {
                let _ = outbox
                    .send(ServerMessage::Error {
                        message: format!("Malformed message: {err}"),
                        error_code: ErrorCode::InvalidInput,
                    })
                    .await;
                continue;
            }
        };

        binding = dispatch(&server, binding, client_message, &outbox).await;
    }

    cleanup(&server, binding).await;
    let _ = send_task.await;
}

async fn dispatch(
    server: &Arc<GameServer>,
    binding: Binding,
    message: ClientMessage,
    outbox: &mpsc::Sender<ServerMessage>,
) -> Binding {
    match (binding, message) {
        (Binding::Unbound, ClientMessage::CreateRoom { name, appearance }) => {
            if let Err(err) = validate_participant_name(&name) {
                let _ = outbox
                    .send(ServerMessage::RoomJoinFailed {
                        reason: err.message,
                        error_code: err.code,
                    })
                    .await;
                return Binding::Unbound;
            }
            match server.create_room(name, appearance, outbox.clone()).await {
                JoinOutcome::Success {
                    participant_id,
                    snapshot,
                } => {
                    let room_code = snapshot.room_code.clone();
                    let _ = outbox
                        .send(ServerMessage::RoomCreated {
                            room_code: room_code.clone(),
                        })
                        .await;
                    Binding::Participant {
                        room_code,
                        participant_id,
                    }
                }
                JoinOutcome::Failure { reason, error_code } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoinFailed { reason, error_code })
                        .await;
                    Binding::Unbound
                }
            }
        }
        (
            Binding::Unbound,
            ClientMessage::JoinRoom {
                room_code,
                name,
                appearance,
            },
        ) => {
            if let Err(err) = validate_room_code(&room_code) {
                let _ = outbox
                    .send(ServerMessage::RoomJoinFailed {
                        reason: err.message,
                        error_code: err.code,
                    })
                    .await;
                return Binding::Unbound;
            }
            if let Err(err) = validate_participant_name(&name) {
                let _ = outbox
                    .send(ServerMessage::RoomJoinFailed {
                        reason: err.message,
                        error_code: err.code,
                    })
                    .await;
                return Binding::Unbound;
            }
            match server
                .join_room(&room_code, name, appearance, outbox.clone())
                .await
            {
                JoinOutcome::Success {
                    participant_id,
                    snapshot,
                } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoined(Box::new(snapshot)))
                        .await;
                    Binding::Participant {
                        room_code,
                        participant_id,
                    }
                }
                JoinOutcome::Failure { reason, error_code } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoinFailed { reason, error_code })
                        .await;
                    Binding::Unbound
                }
            }
        }
        (
            Binding::Unbound,
            ClientMessage::ReconnectToRoom {
                room_code,
                name,
                original_participant_id,
            },
        ) => {
            if let Err(err) = validate_room_code(&room_code) {
                let _ = outbox
                    .send(ServerMessage::RoomJoinFailed {
                        reason: err.message,
                        error_code: err.code,
                    })
                    .await;
                return Binding::Unbound;
            }
            match server
                .reconnect(&room_code, name, original_participant_id, outbox.clone())
                .await
            {
                JoinOutcome::Success {
                    participant_id,
                    snapshot,
                } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoined(Box::new(snapshot)))
                        .await;
                    info!(%participant_id, room_code, "participant reconnected");
                    Binding::Participant {
                        room_code,
                        participant_id,
                    }
                }
                JoinOutcome::Failure { reason, error_code } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoinFailed { reason, error_code })
                        .await;
                    Binding::Unbound
                }
            }
        }
        (
            Binding::Unbound,
            ClientMessage::JoinRoomAsViewer { room_code, name },
        ) => {
            if let Err(err) = validate_room_code(&room_code) {
                let _ = outbox
                    .send(ServerMessage::RoomJoinFailed {
                        reason: err.message,
                        error_code: err.code,
                    })
                    .await;
                return Binding::Unbound;
            }
            match server.join_as_viewer(&room_code, name, outbox.clone()).await {
                ViewerJoinOutcome::Success { viewer_id, snapshot } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoined(Box::new(snapshot)))
                        .await;
                    Binding::Viewer {
                        room_code,
                        viewer_id,
                    }
                }
                ViewerJoinOutcome::Failure { reason, error_code } => {
                    let _ = outbox
                        .send(ServerMessage::RoomJoinFailed { reason, error_code })
                        .await;
                    Binding::Unbound
                }
            }
        }

        // Any of the above arriving on an already-bound connection, or an
        // unbound connection sending anything else, is a no-op error.
        (Binding::Unbound, _) => {
            let _ = outbox
                .send(ServerMessage::Error {
                    message: "Join or create a room before sending this message".into(),
                    error_code: ErrorCode::NotInRoom,
                })
                .await;
            Binding::Unbound
        }

        (
            Binding::Participant {
                room_code,
                participant_id,
            },
            client_message,
        ) => {
            dispatch_participant(server, &room_code, participant_id, client_message, outbox).await;
            Binding::Participant {
                room_code,
                participant_id,
            }
        }

        (
            Binding::Viewer {
                room_code,
                viewer_id,
            },
            client_message,
        ) => {
            dispatch_viewer(server, &room_code, viewer_id, client_message, outbox).await;
            Binding::Viewer {
                room_code,
                viewer_id,
            }
        }
    }
}

async fn dispatch_participant(
    server: &Arc<GameServer>,
    room_code: &str,
    participant_id: ParticipantId,
    message: ClientMessage,
    outbox: &mpsc::Sender<ServerMessage>,
) {
    let Some(handle) = server.rooms.get(room_code) else {
        let _ = outbox
            .send(ServerMessage::Error {
                message: ErrorCode::RoomNotFound.description().to_string(),
                error_code: ErrorCode::RoomNotFound,
            })
            .await;
        return;
    };

    let command = match message {
        ClientMessage::LeaveRoom => RoomCommand::Leave { participant_id },
        ClientMessage::StartGame => RoomCommand::StartGame { participant_id },
        ClientMessage::UpdateGameSettings(settings) => RoomCommand::UpdateGameSettings {
            participant_id,
            settings,
        },
        ClientMessage::SelectPrompt { prompt_id } => RoomCommand::SelectPrompt {
            participant_id,
            prompt_id,
        },
        ClientMessage::SubmitSounds { sound_ids } => {
            if let Err(err) = validate_submission(&sound_ids) {
                let _ = outbox
                    .send(ServerMessage::Error {
                        message: err.message,
                        error_code: err.code,
                    })
                    .await;
                return;
            }
            RoomCommand::SubmitSounds {
                participant_id,
                sound_ids,
            }
        }
        ClientMessage::SelectWinner { index } => RoomCommand::SelectWinner {
            participant_id,
            index,
        },
        ClientMessage::VoteOnReconnection {
            continue_without_player,
        } => RoomCommand::VoteOnReconnection {
            participant_id,
            continue_without_player,
        },
        ClientMessage::WinnerAudioComplete => RoomCommand::WinnerAudioComplete { participant_id },
        ClientMessage::RequestJudgingPlayback => {
            RoomCommand::RequestJudgingPlayback { participant_id }
        }
        ClientMessage::RestartGame => RoomCommand::RestartGame { participant_id },
        _ => {
            let _ = outbox
                .send(ServerMessage::Error {
                    message: "This message is not valid for a participant connection".into(),
                    error_code: ErrorCode::InvalidInput,
                })
                .await;
            return;
        }
    };

    handle.send(command).await;
}

async fn dispatch_viewer(
    server: &Arc<GameServer>,
    room_code: &str,
    viewer_id: ViewerId,
    message: ClientMessage,
    outbox: &mpsc::Sender<ServerMessage>,
) {
    let Some(handle) = server.rooms.get(room_code) else {
        let _ = outbox
            .send(ServerMessage::Error {
                message: ErrorCode::RoomNotFound.description().to_string(),
                error_code: ErrorCode::RoomNotFound,
            })
            .await;
        return;
    };

    let command = match message {
        ClientMessage::LeaveRoom => RoomCommand::ViewerLeave { viewer_id },
        ClientMessage::RequestNextSubmission => RoomCommand::RequestNextSubmission { viewer_id },
        ClientMessage::RequestMainScreenUpdate => {
            RoomCommand::RequestMainScreenUpdate { viewer_id }
        }
        _ => {
            let _ = outbox
                .send(ServerMessage::Error {
                    message: "This message is not valid for a viewer connection".into(),
                    error_code: ErrorCode::InvalidInput,
                })
                .await;
            return;
        }
    };

    handle.send(command).await;
}

async fn cleanup(server: &Arc<GameServer>, binding: Binding) {
    match binding {
        Binding::Unbound => {}
        Binding::Participant {
            room_code,
            participant_id,
        } => {
            if let Some(handle) = server.rooms.get(&room_code) {
                handle.send(RoomCommand::Disconnected { participant_id }).await;
            }
        }
        Binding::Viewer {
            room_code,
            viewer_id,
        } => {
            if let Some(handle) = server.rooms.get(&room_code) {
                handle.send(RoomCommand::ViewerLeave { viewer_id }).await;
            }
        }
    }
}
