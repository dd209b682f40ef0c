//! Room state, phase machine, scoring, and deterministic shuffling
//! (§3, §4.2, §4.3, §4.4).

pub mod participant;
pub mod phase;
pub mod room;
pub mod scoring;
pub mod shuffle;
pub mod state_machine;
pub mod submission;

pub use participant::{allocate_appearance, DisconnectedParticipant, Participant};
pub use phase::GamePhase;
pub use room::{Room, RoomSnapshot};
pub use submission::Submission;
