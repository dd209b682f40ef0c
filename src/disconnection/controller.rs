//! Pure decision logic for the three-phase disconnection protocol (§4.6).
//! The per-room actor owns the actual timers and network sends; this module
//! decides *what* should happen given the room's current state.

use rand::seq::IndexedRandom;

use crate::game::phase::GamePhase;
use crate::game::room::Room;
use crate::protocol::types::ParticipantId;

/// What, if anything, should be restarted when a room resumes from
/// `PAUSED_FOR_DISCONNECTION` (§4.6 "Resumption").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeTimerAction {
    None,
    RestartSoundSelection,
    RestartJudgeSelection,
}

/// Decide which timer (if any) should restart when resuming into
/// `resumed_phase`, honoring the idempotency flags recorded on the room.
pub fn resume_timer_action(room: &Room, resumed_phase: GamePhase) -> ResumeTimerAction {
    match resumed_phase {
        GamePhase::SoundSelection if room.sound_selection_timer_started => {
            ResumeTimerAction::RestartSoundSelection
        }
        GamePhase::JudgeSelection if !room.judge_selection_timer_started => {
            ResumeTimerAction::RestartJudgeSelection
        }
        _ => ResumeTimerAction::None,
    }
}

/// Pick a uniformly random active participant to receive the reconnection
/// vote prompt (§4.6 Phase B).
pub fn pick_voter(active: &[ParticipantId]) -> Option<ParticipantId> {
    let mut rng = rand::rng();
    active.choose(&mut rng).copied()
}

/// If the current judge is no longer active, the next-in-rotation
/// replacement judge (§4.6 "If the current judge is no longer active, pick
/// the next-in-rotation").
pub fn replacement_judge_if_needed(room: &Room) -> Option<ParticipantId> {
    match room.judge_id {
        Some(judge_id) if room.find_participant(judge_id).is_some() => None,
        _ => room.participants.first().map(|p| p.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::participant::Participant;
    use crate::protocol::types::Appearance;
    use chrono::Utc;
    use uuid::Uuid;

    fn participant() -> Participant {
        Participant::new(
            Uuid::new_v4(),
            "p".into(),
            Appearance {
                color: "teal",
                emoji: "🐙",
            },
            false,
        )
    }

    #[test]
    fn restarts_sound_selection_only_if_flagged() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        room.sound_selection_timer_started = true;
        assert_eq!(
            resume_timer_action(&room, GamePhase::SoundSelection),
            ResumeTimerAction::RestartSoundSelection
        );
        room.sound_selection_timer_started = false;
        assert_eq!(resume_timer_action(&room, GamePhase::SoundSelection), ResumeTimerAction::None);
    }

    #[test]
    fn restarts_judge_selection_only_if_not_already_started() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        assert_eq!(
            resume_timer_action(&room, GamePhase::JudgeSelection),
            ResumeTimerAction::RestartJudgeSelection
        );
        room.judge_selection_timer_started = true;
        assert_eq!(resume_timer_action(&room, GamePhase::JudgeSelection), ResumeTimerAction::None);
    }

    #[test]
    fn replacement_judge_picks_next_in_rotation_when_judge_gone() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let remaining = participant();
        let remaining_id = remaining.id;
        room.add_participant(remaining);
        room.judge_id = Some(Uuid::new_v4());
        assert_eq!(replacement_judge_if_needed(&room), Some(remaining_id));
    }

    #[test]
    fn no_replacement_needed_when_judge_still_active() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let judge = participant();
        let judge_id = judge.id;
        room.add_participant(judge);
        room.judge_id = Some(judge_id);
        assert_eq!(replacement_judge_if_needed(&room), None);
    }
}
