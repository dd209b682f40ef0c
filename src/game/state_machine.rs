//! Phase and role guards for inbound game events (§4.2, §4.8 steps 3-4).
//!
//! These are pure checks; the actual transitions (which require sampling
//! from the asset catalog and touching timers) are carried out by the
//! per-room actor in `server::room_actor`, which calls into this module to
//! decide whether an inbound event is even legal before doing any work.

use rand::Rng;

use super::phase::GamePhase;
use super::room::Room;
use crate::protocol::types::{ParticipantId, SoundId};
use crate::protocol::ErrorCode;

pub fn validate_start_game(
    room: &Room,
    caller: ParticipantId,
    min_participants: usize,
) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::Lobby {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_host(caller) {
        return Err(ErrorCode::NotHost);
    }
    if room.participants.len() < min_participants {
        return Err(ErrorCode::InvalidInput);
    }
    Ok(())
}

pub fn validate_update_settings(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::Lobby {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_host(caller) {
        return Err(ErrorCode::NotHost);
    }
    Ok(())
}

pub fn validate_select_prompt(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::PromptSelection {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_judge(caller) {
        return Err(ErrorCode::NotJudge);
    }
    Ok(())
}

pub fn validate_submit_sounds(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::SoundSelection {
        return Err(ErrorCode::WrongPhase);
    }
    if room.is_judge(caller) {
        return Err(ErrorCode::JudgeCannotSubmit);
    }
    if room.find_participant(caller).is_none() {
        return Err(ErrorCode::ParticipantNotFound);
    }
    if room.submissions.iter().any(|s| s.participant_id == caller) {
        return Err(ErrorCode::AlreadySubmitted);
    }
    Ok(())
}

pub fn validate_select_winner(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::Judging {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_judge(caller) {
        return Err(ErrorCode::NotJudge);
    }
    Ok(())
}

pub fn validate_restart_game(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::GameOver {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_host(caller) {
        return Err(ErrorCode::NotHost);
    }
    Ok(())
}

pub fn validate_request_judging_playback(room: &Room, caller: ParticipantId) -> Result<(), ErrorCode> {
    if room.phase != GamePhase::Judging {
        return Err(ErrorCode::WrongPhase);
    }
    if !room.is_judge(caller) {
        return Err(ErrorCode::NotJudge);
    }
    Ok(())
}

/// Auto-generate a submission for a non-submitting participant when the
/// sound-selection timer expires: 70% chance of two sounds, 30% chance of
/// one, sampled from that participant's assigned set (§4.2 "Timer expires").
pub fn auto_generate_submission(sound_set: &[SoundId]) -> Vec<SoundId> {
    if sound_set.is_empty() {
        return Vec::new();
    }
    let mut rng = rand::rng();
    let take = if sound_set.len() >= 2 && rng.random_bool(0.7) {
        2
    } else {
        1
    };
    let mut indices: Vec<usize> = (0..sound_set.len()).collect();
    use rand::seq::SliceRandom;
    indices.shuffle(&mut rng);
    indices
        .into_iter()
        .take(take)
        .map(|i| sound_set[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_submission_draws_from_assigned_set() {
        let set: Vec<SoundId> = (0..10).map(|i| format!("s{i}")).collect();
        for _ in 0..50 {
            let submission = auto_generate_submission(&set);
            assert!(submission.len() == 1 || submission.len() == 2);
            assert!(submission.iter().all(|id| set.contains(id)));
        }
    }

    #[test]
    fn auto_submission_on_single_sound_set_never_duplicates() {
        let set = vec!["only".to_string()];
        let submission = auto_generate_submission(&set);
        assert_eq!(submission, vec!["only".to_string()]);
    }
}
