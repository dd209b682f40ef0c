use crate::protocol::types::{ParticipantId, SoundId};

/// One participant's sound choice for the current round (§3 Submission).
#[derive(Debug, Clone)]
pub struct Submission {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub sound_ids: Vec<SoundId>,
}
