//! Room registry: room code to actor handle (§4.9 "Room Store").

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::room_actor::RoomCommand;

/// A cloneable handle to a live room's command queue. Dropping every clone
/// of a room's sender is what lets its actor task notice its channel has
/// closed and exit, but in practice rooms remove themselves from the store
/// and return from their run loop directly (§4.10 maintenance sweep).
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn new(sender: mpsc::Sender<RoomCommand>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, command: RoomCommand) {
        let _ = self.sender.send(command).await;
    }
}

/// Registry of live rooms keyed by room code.
#[derive(Default)]
pub struct RoomStore {
    rooms: DashMap<String, RoomHandle>,
    max_rooms: usize,
}

impl RoomStore {
    pub fn new(max_rooms: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            max_rooms,
        }
    }

    pub fn get(&self, code: &str) -> Option<RoomHandle> {
        self.rooms.get(code).map(|entry| entry.clone())
    }

    pub fn is_live(&self, code: &str) -> bool {
        self.rooms.contains_key(code)
    }

    pub fn is_full(&self) -> bool {
        self.rooms.len() >= self.max_rooms
    }

    pub fn insert(&self, code: String, handle: RoomHandle) {
        self.rooms.insert(code, handle);
    }

    pub fn remove(&self, code: &str) {
        self.rooms.remove(code);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn codes(&self) -> Vec<String> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capacity_reflects_max_rooms() {
        let store = RoomStore::new(1);
        assert!(!store.is_full());
        let (tx, _rx) = mpsc::channel(1);
        store.insert("AAAA".into(), RoomHandle::new(tx));
        assert!(store.is_full());
        assert!(store.is_live("AAAA"));
        store.remove("AAAA");
        assert!(!store.is_live("AAAA"));
    }
}
