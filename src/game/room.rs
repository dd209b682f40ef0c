use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::participant::{DisconnectedParticipant, Participant};
use super::phase::GamePhase;
use super::submission::Submission;
use crate::assets::Prompt;
use crate::protocol::messages::{PromptSummary, SubmissionSummary};
use crate::protocol::types::{ParticipantId, PromptId, ViewerId};

/// A pending reconnection vote (§4.6 Phase B).
#[derive(Debug, Clone)]
pub struct ReconnectionVote {
    pub voter_id: ParticipantId,
    pub disconnected_name: String,
    pub started_at: DateTime<Utc>,
}

/// Authoritative state for one live room (§3 Room).
#[derive(Debug, Clone)]
pub struct Room {
    pub code: String,
    pub participants: Vec<Participant>,
    pub disconnected: Vec<DisconnectedParticipant>,
    pub phase: GamePhase,
    pub previous_phase: Option<GamePhase>,
    pub current_round: u32,
    pub max_rounds: u32,
    pub max_score: u32,
    pub allow_explicit_content: bool,
    pub judge_id: Option<ParticipantId>,
    pub current_prompt: Option<Prompt>,
    pub available_prompts: Vec<Prompt>,
    pub used_prompt_ids: HashSet<PromptId>,
    pub submissions: Vec<Submission>,
    pub randomized_submissions: Vec<Submission>,
    pub shuffle_seed: Option<String>,
    pub current_submission_index: usize,
    pub sound_selection_timer_started: bool,
    pub judge_selection_timer_started: bool,
    pub last_winner: Option<ParticipantId>,
    pub last_winning_submission: Option<Submission>,
    pub overall_winner: Option<ParticipantId>,
    pub disconnection_started_at: Option<DateTime<Utc>>,
    pub reconnection_vote: Option<ReconnectionVote>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            participants: Vec::new(),
            disconnected: Vec::new(),
            phase: GamePhase::Lobby,
            previous_phase: None,
            current_round: 0,
            max_rounds: 8,
            max_score: 5,
            allow_explicit_content: false,
            judge_id: None,
            current_prompt: None,
            available_prompts: Vec::new(),
            used_prompt_ids: HashSet::new(),
            submissions: Vec::new(),
            randomized_submissions: Vec::new(),
            shuffle_seed: None,
            current_submission_index: 0,
            sound_selection_timer_started: false,
            judge_selection_timer_started: false,
            last_winner: None,
            last_winning_submission: None,
            overall_winner: None,
            disconnection_started_at: None,
            reconnection_vote: None,
            created_at: now,
        }
    }

    pub fn host_id(&self) -> Option<ParticipantId> {
        self.participants.iter().find(|p| p.is_host).map(|p| p.id)
    }

    pub fn is_host(&self, id: ParticipantId) -> bool {
        self.host_id() == Some(id)
    }

    pub fn is_judge(&self, id: ParticipantId) -> bool {
        self.judge_id == Some(id)
    }

    pub fn find_participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn find_participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn name_taken(&self, name: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a participant, promoting them to host if they're the first to
    /// join (invariant 1: exactly one host per non-empty room).
    pub fn add_participant(&mut self, mut participant: Participant) {
        if self.participants.is_empty() {
            participant.is_host = true;
        }
        self.participants.push(participant);
    }

    /// Remove a participant, reassigning the host if necessary (§4.6
    /// "Lobby / game-over disconnection"). Returns the removed participant.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(index);
        if removed.is_host {
            if let Some(first) = self.participants.first_mut() {
                first.is_host = true;
            }
        }
        Some(removed)
    }

    pub fn non_judge_participants(&self) -> impl Iterator<Item = &Participant> {
        let judge_id = self.judge_id;
        self.participants
            .iter()
            .filter(move |p| Some(p.id) != judge_id)
    }

    pub fn all_non_judges_submitted(&self) -> bool {
        let submitted: HashSet<ParticipantId> =
            self.submissions.iter().map(|s| s.participant_id).collect();
        self.non_judge_participants().all(|p| submitted.contains(&p.id))
    }

    /// Advance the judge index by one within the active-participant list,
    /// wrapping on overflow (§4.2 "Judge rotation").
    pub fn rotate_judge(&mut self) {
        if self.participants.is_empty() {
            self.judge_id = None;
            return;
        }
        let current_index = self
            .judge_id
            .and_then(|id| self.participants.iter().position(|p| p.id == id));
        let next_index = match current_index {
            Some(i) => (i + 1) % self.participants.len(),
            None => 0,
        };
        self.judge_id = self.participants.get(next_index).map(|p| p.id);
    }

    pub fn top_score(&self) -> u32 {
        self.participants.iter().map(|p| p.score).max().unwrap_or(0)
    }

    pub fn top_scorers(&self) -> Vec<ParticipantId> {
        let top = self.top_score();
        self.participants
            .iter()
            .filter(|p| p.score == top)
            .map(|p| p.id)
            .collect()
    }

    pub fn clear_round_state(&mut self) {
        self.submissions.clear();
        self.randomized_submissions.clear();
        self.shuffle_seed = None;
        self.current_submission_index = 0;
        self.sound_selection_timer_started = false;
        for participant in &mut self.participants {
            participant.sound_set.clear();
        }
    }

    /// Build the wire snapshot sent in `roomCreated`/`roomUpdated`/etc.
    pub fn snapshot(&self, viewer_count: usize, primary_viewer_id: Option<ViewerId>) -> RoomSnapshot {
        RoomSnapshot {
            room_code: self.code.clone(),
            participants: self.participants.iter().map(ParticipantView::from).collect(),
            disconnected_participants: self
                .disconnected
                .iter()
                .map(DisconnectedParticipantView::from)
                .collect(),
            phase: self.phase,
            current_round: self.current_round,
            max_rounds: self.max_rounds,
            max_score: self.max_score,
            allow_explicit_content: self.allow_explicit_content,
            judge_id: self.judge_id,
            host_id: self.host_id(),
            viewer_count,
            primary_viewer_id,
            last_winner_id: self.last_winner,
            overall_winner_id: self.overall_winner,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub participant_id: ParticipantId,
    pub name: String,
    pub color: &'static str,
    pub emoji: &'static str,
    pub score: u32,
    pub is_host: bool,
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            participant_id: p.id,
            name: p.name.clone(),
            color: p.appearance.color,
            emoji: p.appearance.emoji,
            score: p.score,
            is_host: p.is_host,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedParticipantView {
    pub participant_id: ParticipantId,
    pub name: String,
    pub color: &'static str,
    pub emoji: &'static str,
}

impl From<&DisconnectedParticipant> for DisconnectedParticipantView {
    fn from(p: &DisconnectedParticipant) -> Self {
        Self {
            participant_id: p.original_participant_id,
            name: p.name.clone(),
            color: p.appearance.color,
            emoji: p.appearance.emoji,
        }
    }
}

/// The full room state a client needs to render the room (§6).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room_code: String,
    pub participants: Vec<ParticipantView>,
    pub disconnected_participants: Vec<DisconnectedParticipantView>,
    pub phase: GamePhase,
    pub current_round: u32,
    pub max_rounds: u32,
    pub max_score: u32,
    pub allow_explicit_content: bool,
    pub judge_id: Option<ParticipantId>,
    pub host_id: Option<ParticipantId>,
    pub viewer_count: usize,
    pub primary_viewer_id: Option<ViewerId>,
    pub last_winner_id: Option<ParticipantId>,
    pub overall_winner_id: Option<ParticipantId>,
}

pub fn prompt_summary(prompt: &Prompt) -> PromptSummary {
    PromptSummary {
        id: prompt.id.clone(),
        text: prompt.display_text.clone(),
        category: prompt.category.clone(),
    }
}

pub fn submission_summary(submission: &Submission) -> SubmissionSummary {
    SubmissionSummary {
        participant_id: submission.participant_id,
        display_name: submission.display_name.clone(),
        sound_ids: submission.sound_ids.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::Appearance;
    use uuid::Uuid;

    fn participant(name: &str) -> Participant {
        Participant::new(
            Uuid::new_v4(),
            name.to_string(),
            Appearance {
                color: "teal",
                emoji: "🐙",
            },
            false,
        )
    }

    #[test]
    fn first_participant_becomes_host() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let alice = participant("Alice");
        let id = alice.id;
        room.add_participant(alice);
        assert_eq!(room.host_id(), Some(id));
    }

    #[test]
    fn host_reassigned_on_departure() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let alice = participant("Alice");
        let bob = participant("Bob");
        let alice_id = alice.id;
        let bob_id = bob.id;
        room.add_participant(alice);
        room.add_participant(bob);
        room.remove_participant(alice_id);
        assert_eq!(room.host_id(), Some(bob_id));
    }

    #[test]
    fn judge_rotation_wraps() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let a = participant("A");
        let b = participant("B");
        let a_id = a.id;
        let b_id = b.id;
        room.add_participant(a);
        room.add_participant(b);
        room.judge_id = Some(a_id);
        room.rotate_judge();
        assert_eq!(room.judge_id, Some(b_id));
        room.rotate_judge();
        assert_eq!(room.judge_id, Some(a_id));
    }

    #[test]
    fn top_scorers_detects_ties() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        let mut a = participant("A");
        let mut b = participant("B");
        a.score = 2;
        b.score = 2;
        let mut c = participant("C");
        c.score = 1;
        room.add_participant(a);
        room.add_participant(b);
        room.add_participant(c);
        assert_eq!(room.top_scorers().len(), 2);
    }
}
