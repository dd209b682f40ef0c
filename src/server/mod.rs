//! Ties together the room store, connection manager, and asset catalog
//! into the server-facing API the websocket layer calls into (§2, §4.9).
//!
//! Each room runs as its own actor task (`room_actor`); this module only
//! handles the entry points that don't yet belong to a specific room:
//! creating one, finding one by code, and the periodic maintenance sweep.

pub mod connection_manager;
pub mod disconnection_handlers;
pub mod game_handlers;
pub mod maintenance;
pub mod room_actor;
pub mod room_service;
pub mod room_store;
pub mod timers;
pub mod viewer_handlers;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::assets::AssetCatalog;
use crate::config::{Config, GameConfig};
use crate::protocol::messages::{AppearanceRequest, ServerMessage};
use crate::protocol::room_codes::generate_unique_room_code;
use crate::protocol::types::ParticipantId;
use crate::protocol::ErrorCode;

pub use connection_manager::ConnectionManager;
pub use room_actor::{JoinOutcome, JoinRequest, ReconnectRequest, ViewerJoinOutcome, ViewerJoinRequest};
pub use room_store::RoomStore;

/// The top-level server handle shared by every connection task.
pub struct GameServer {
    pub rooms: Arc<RoomStore>,
    pub connections: Arc<ConnectionManager>,
    pub catalog: Arc<AssetCatalog>,
    pub game_config: Arc<GameConfig>,
    pub empty_room_timeout_secs: u64,
}

impl GameServer {
    pub fn new(config: &Config) -> Arc<Self> {
        let server = Arc::new(Self {
            rooms: Arc::new(RoomStore::new(config.server.max_rooms)),
            connections: Arc::new(ConnectionManager::new()),
            catalog: Arc::new(AssetCatalog::new(config.assets.clone())),
            game_config: Arc::new(config.game.clone()),
            empty_room_timeout_secs: config.server.empty_room_timeout_secs,
        });

        let store = server.rooms.clone();
        let interval_secs = config.server.room_cleanup_interval_secs;
        tokio::spawn(async move {
            maintenance::run(store, interval_secs).await;
        });

        server
    }

    /// Spawn a brand-new room with a freshly generated, unique code and
    /// register the caller as its sole (and thus host) participant.
    pub async fn create_room(
        &self,
        name: String,
        appearance: AppearanceRequest,
        outbox: mpsc::Sender<ServerMessage>,
    ) -> JoinOutcome {
        if self.rooms.is_full() {
            return JoinOutcome::Failure {
                reason: "The server has reached its room capacity".into(),
                error_code: ErrorCode::RoomFull,
            };
        }

        let code = generate_unique_room_code(|candidate| self.rooms.is_live(candidate));
        let handle = room_actor::spawn(
            code.clone(),
            self.catalog.clone(),
            self.game_config.clone(),
            self.connections.clone(),
            self.rooms.clone(),
            self.empty_room_timeout_secs,
        );

        let (reply, receiver) = oneshot::channel();
        handle
            .send(room_actor::RoomCommand::Join(JoinRequest {
                name,
                appearance,
                outbox,
                reply,
            }))
            .await;

        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => JoinOutcome::Failure {
                reason: "Room actor terminated unexpectedly".into(),
                error_code: ErrorCode::InternalError,
            },
        }
    }

    pub async fn join_room(
        &self,
        room_code: &str,
        name: String,
        appearance: AppearanceRequest,
        outbox: mpsc::Sender<ServerMessage>,
    ) -> JoinOutcome {
        let Some(handle) = self.rooms.get(room_code) else {
            return JoinOutcome::Failure {
                reason: "No room exists with that code".into(),
                error_code: ErrorCode::RoomNotFound,
            };
        };

        let (reply, receiver) = oneshot::channel();
        handle
            .send(room_actor::RoomCommand::Join(JoinRequest {
                name,
                appearance,
                outbox,
                reply,
            }))
            .await;

        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => JoinOutcome::Failure {
                reason: "Room actor terminated unexpectedly".into(),
                error_code: ErrorCode::InternalError,
            },
        }
    }

    pub async fn reconnect(
        &self,
        room_code: &str,
        name: String,
        original_participant_id: ParticipantId,
        outbox: mpsc::Sender<ServerMessage>,
    ) -> JoinOutcome {
        let Some(handle) = self.rooms.get(room_code) else {
            return JoinOutcome::Failure {
                reason: "No room exists with that code".into(),
                error_code: ErrorCode::RoomNotFound,
            };
        };

        let (reply, receiver) = oneshot::channel();
        handle
            .send(room_actor::RoomCommand::Reconnect(ReconnectRequest {
                name,
                original_participant_id,
                outbox,
                reply,
            }))
            .await;

        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => JoinOutcome::Failure {
                reason: "Room actor terminated unexpectedly".into(),
                error_code: ErrorCode::InternalError,
            },
        }
    }

    pub async fn join_as_viewer(
        &self,
        room_code: &str,
        name: Option<String>,
        outbox: mpsc::Sender<ServerMessage>,
    ) -> ViewerJoinOutcome {
        let Some(handle) = self.rooms.get(room_code) else {
            return ViewerJoinOutcome::Failure {
                reason: "No room exists with that code".into(),
                error_code: ErrorCode::RoomNotFound,
            };
        };

        let (reply, receiver) = oneshot::channel();
        handle
            .send(room_actor::RoomCommand::JoinAsViewer(ViewerJoinRequest {
                name,
                outbox,
                reply,
            }))
            .await;

        match receiver.await {
            Ok(outcome) => outcome,
            Err(_) => ViewerJoinOutcome::Failure {
                reason: "Room actor terminated unexpectedly".into(),
                error_code: ErrorCode::InternalError,
            },
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn active_connection_count(&self) -> (usize, usize) {
        (
            self.connections.active_participant_count(),
            self.connections.active_viewer_count(),
        )
    }
}

pub fn log_startup(config: &Config) {
    info!(
        port = config.port,
        max_rooms = config.server.max_rooms,
        "game server configured"
    );
}
