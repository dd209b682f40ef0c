use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default constants for validation (can be overridden by config).
pub const DEFAULT_MAX_PARTICIPANT_NAME_LENGTH: usize = 24;
pub const DEFAULT_ROOM_CODE_LENGTH: usize = 4;
pub const DEFAULT_MIN_PARTICIPANTS: usize = 3;
pub const DEFAULT_MAX_PARTICIPANTS: usize = 8;

/// Stable identifier for a participant, assigned per connection.
///
/// A participant's transport identifier *is* its participant identifier;
/// reconnection rebinds a fresh transport identifier to the original one
/// recorded in the room's disconnected-participant list.
pub type ParticipantId = Uuid;

/// Stable identifier for a viewer connection.
pub type ViewerId = Uuid;

/// Identifier for a catalog prompt.
pub type PromptId = String;

/// Identifier for a catalog sound.
pub type SoundId = String;

/// Fixed color palette assigned to participants, colors are never reused
/// within a single room (§3 Participant.color).
pub const COLOR_PALETTE: &[&str] = &[
    "crimson", "tangerine", "goldenrod", "forest", "teal", "cerulean", "indigo", "magenta",
    "slate", "rose",
];

/// Fixed emoji palette assigned to participants, emoji are never reused
/// within a single room (§3 Participant.emoji).
pub const EMOJI_PALETTE: &[&str] = &[
    "🦊", "🐙", "🦁", "🐸", "🦄", "🐼", "🦉", "🐳", "🦋", "🐢",
];

/// Number of sounds made available to a non-judge participant during
/// sound selection (§3 Participant.sound_set, GLOSSARY "Sound set").
pub const SOUND_SET_SIZE: usize = 10;

/// Number of prompt choices offered to the judge during PROMPT_SELECTION.
pub const PROMPT_CHOICE_COUNT: usize = 6;

/// Placeholder token substituted with a random participant's name at
/// prompt-selection time (§3 Prompt.display_text).
pub const PROMPT_PLACEHOLDER_TOKEN: &str = "<ANY>";

/// A participant's chosen display color and emoji, allocated without
/// collision within a room (component: Identifier Allocator, §2).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appearance {
    pub color: &'static str,
    pub emoji: &'static str,
}
