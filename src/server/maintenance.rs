//! Periodic sweep driving each room's `MaintenanceTick` (§4.10): prunes
//! stale disconnected-participant records and destroys rooms that have sat
//! empty past the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::room_actor::RoomCommand;
use super::room_store::RoomStore;

pub async fn run(store: Arc<RoomStore>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    loop {
        interval.tick().await;
        let codes = store.codes();
        debug!(room_count = codes.len(), "running maintenance sweep");
        for code in codes {
            if let Some(handle) = store.get(&code) {
                handle.send(RoomCommand::MaintenanceTick).await;
            }
        }
    }
}
