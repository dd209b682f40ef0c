//! Tracks outbound channels for every connected participant and viewer, and
//! performs the actual send (§4.8: "the dispatcher is the only component
//! that touches the transport" — this is that touchpoint).

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::trace;

use crate::protocol::messages::ServerMessage;
use crate::protocol::types::{ParticipantId, ViewerId};

/// A registered connection's outbound sender. The dedicated send task on
/// the other end guarantees in-order delivery (§5 "Events sent by the
/// server to a given transport connection are delivered in emission order").
pub type Outbox = mpsc::Sender<ServerMessage>;

/// Central registry mapping live participant/viewer identifiers to their
/// outbound channel. Connections register on join and deregister on
/// disconnect; a stale send silently no-ops rather than erroring, since the
/// other side may have already dropped its receiver.
#[derive(Default)]
pub struct ConnectionManager {
    participants: DashMap<ParticipantId, Outbox>,
    viewers: DashMap<ViewerId, Outbox>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_participant(&self, id: ParticipantId, outbox: Outbox) {
        self.participants.insert(id, outbox);
    }

    pub fn unregister_participant(&self, id: ParticipantId) {
        self.participants.remove(&id);
    }

    pub fn register_viewer(&self, id: ViewerId, outbox: Outbox) {
        self.viewers.insert(id, outbox);
    }

    pub fn unregister_viewer(&self, id: ViewerId) {
        self.viewers.remove(&id);
    }

    pub async fn send_to_participant(&self, id: ParticipantId, message: ServerMessage) {
        let outbox = self.participants.get(&id).map(|entry| entry.clone());
        if let Some(outbox) = outbox {
            if outbox.send(message).await.is_err() {
                trace!(%id, "participant outbox closed, dropping message");
            }
        }
    }

    pub async fn send_to_viewer(&self, id: ViewerId, message: ServerMessage) {
        let outbox = self.viewers.get(&id).map(|entry| entry.clone());
        if let Some(outbox) = outbox {
            if outbox.send(message).await.is_err() {
                trace!(%id, "viewer outbox closed, dropping message");
            }
        }
    }

    /// Broadcast to every active participant and every viewer in a room.
    /// Callers pass the membership lists explicitly since the connection
    /// manager itself has no notion of room membership (§9 "two maps keyed
    /// by identifier, never cyclic owning references").
    pub async fn broadcast(
        &self,
        participant_ids: &[ParticipantId],
        viewer_ids: &[ViewerId],
        message: ServerMessage,
    ) {
        for &id in participant_ids {
            self.send_to_participant(id, message.clone()).await;
        }
        for &id in viewer_ids {
            self.send_to_viewer(id, message.clone()).await;
        }
    }

    pub fn active_participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn active_viewer_count(&self) -> usize {
        self.viewers.len()
    }
}
