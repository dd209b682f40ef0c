//! Primary-viewer election over a room's connected viewers (§4.7).

use crate::protocol::types::ViewerId;

/// Tracks the passive display endpoints connected to one room and which of
/// them currently drives playback.
#[derive(Debug, Default, Clone)]
pub struct ViewerRegistry {
    /// Insertion order; the first entry is primary (invariant 6: exactly one
    /// primary iff non-empty).
    viewers: Vec<ViewerId>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    pub fn count(&self) -> usize {
        self.viewers.len()
    }

    pub fn primary(&self) -> Option<ViewerId> {
        self.viewers.first().copied()
    }

    pub fn is_primary(&self, id: ViewerId) -> bool {
        self.primary() == Some(id)
    }

    /// Register a new viewer. The first viewer to join becomes primary.
    pub fn join(&mut self, id: ViewerId) {
        if !self.viewers.contains(&id) {
            self.viewers.push(id);
        }
    }

    /// Remove a viewer. If it was primary, the next viewer in iteration
    /// order (deterministic, first-in-line) is promoted.
    pub fn leave(&mut self, id: ViewerId) {
        self.viewers.retain(|v| *v != id);
    }

    pub fn ids(&self) -> &[ViewerId] {
        &self.viewers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn first_viewer_is_primary() {
        let mut registry = ViewerRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.join(a);
        registry.join(b);
        assert_eq!(registry.primary(), Some(a));
    }

    #[test]
    fn promotion_on_primary_departure() {
        let mut registry = ViewerRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.join(a);
        registry.join(b);
        registry.leave(a);
        assert_eq!(registry.primary(), Some(b));
    }

    #[test]
    fn no_primary_when_empty() {
        let registry = ViewerRegistry::new();
        assert_eq!(registry.primary(), None);
    }
}
