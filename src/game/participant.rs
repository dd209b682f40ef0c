use chrono::{DateTime, Utc};

use crate::protocol::messages::AppearanceRequest;
use crate::protocol::types::{Appearance, ParticipantId, SoundId, COLOR_PALETTE, EMOJI_PALETTE};

/// An active member of a room (§3 Participant).
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub appearance: Appearance,
    pub score: u32,
    pub is_host: bool,
    pub disconnected: bool,
    /// Per-round sound set assigned during SOUND_SELECTION; empty for the
    /// judge and outside that phase.
    pub sound_set: Vec<SoundId>,
}

impl Participant {
    pub fn new(id: ParticipantId, name: String, appearance: Appearance, is_host: bool) -> Self {
        Self {
            id,
            name,
            appearance,
            score: 0,
            is_host,
            disconnected: false,
            sound_set: Vec::new(),
        }
    }
}

/// A snapshot of a [`Participant`] retained across a disconnection window
/// (§3 Disconnected Participant).
#[derive(Debug, Clone)]
pub struct DisconnectedParticipant {
    pub original_participant_id: ParticipantId,
    pub name: String,
    pub appearance: Appearance,
    pub score: u32,
    pub is_host: bool,
    pub was_judge: bool,
    pub sound_set: Vec<SoundId>,
    pub disconnected_at: DateTime<Utc>,
}

impl DisconnectedParticipant {
    pub fn snapshot(participant: &Participant, was_judge: bool, now: DateTime<Utc>) -> Self {
        Self {
            original_participant_id: participant.id,
            name: participant.name.clone(),
            appearance: participant.appearance,
            score: participant.score,
            is_host: participant.is_host,
            was_judge,
            sound_set: participant.sound_set.clone(),
            disconnected_at: now,
        }
    }

    /// Rebuild an active participant from this snapshot on reconnection.
    pub fn restore(self) -> Participant {
        Participant {
            id: self.original_participant_id,
            name: self.name,
            appearance: self.appearance,
            score: self.score,
            is_host: self.is_host,
            disconnected: false,
            sound_set: self.sound_set,
        }
    }
}

/// Allocate a color/emoji pair that doesn't collide with any appearance
/// already in use within the room (component: Identifier Allocator, §2).
pub fn allocate_appearance(taken: &[Appearance], requested: &AppearanceRequest) -> Appearance {
    let color = requested
        .color
        .as_deref()
        .and_then(|c| COLOR_PALETTE.iter().find(|&&p| p.eq_ignore_ascii_case(c)))
        .filter(|&&c| !taken.iter().any(|a| a.color == c))
        .copied()
        .unwrap_or_else(|| {
            COLOR_PALETTE
                .iter()
                .find(|&&c| !taken.iter().any(|a| a.color == c))
                .copied()
                .unwrap_or(COLOR_PALETTE[taken.len() % COLOR_PALETTE.len()])
        });

    let emoji = requested
        .emoji
        .as_deref()
        .and_then(|e| EMOJI_PALETTE.iter().find(|&&p| p == e))
        .filter(|&&e| !taken.iter().any(|a| a.emoji == e))
        .copied()
        .unwrap_or_else(|| {
            EMOJI_PALETTE
                .iter()
                .find(|&&e| !taken.iter().any(|a| a.emoji == e))
                .copied()
                .unwrap_or(EMOJI_PALETTE[taken.len() % EMOJI_PALETTE.len()])
        });

    Appearance { color, emoji }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_avoids_collisions() {
        let taken = vec![Appearance {
            color: "crimson",
            emoji: "🦊",
        }];
        let requested = AppearanceRequest {
            color: Some("crimson".into()),
            emoji: Some("🦊".into()),
        };
        let allocated = allocate_appearance(&taken, &requested);
        assert_ne!(allocated.color, "crimson");
        assert_ne!(allocated.emoji, "🦊");
    }

    #[test]
    fn allocator_honors_free_request() {
        let taken = Vec::new();
        let requested = AppearanceRequest {
            color: Some("teal".into()),
            emoji: Some("🐙".into()),
        };
        let allocated = allocate_appearance(&taken, &requested);
        assert_eq!(allocated.color, "teal");
        assert_eq!(allocated.emoji, "🐙");
    }
}
