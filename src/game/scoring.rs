use super::room::Room;
use crate::protocol::types::ParticipantId;

/// Outcome of the end-of-game check run after a round is scored (§4.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Neither the round limit nor the score limit was reached.
    Continue,
    /// The limit was reached but more than one participant shares the top
    /// score; the game continues into sudden death (§9 "no distinct sudden
    /// death state").
    TieBreaker(Vec<ParticipantId>),
    /// The limit was reached and exactly one participant holds the top
    /// score.
    GameOver(ParticipantId),
}

/// Evaluate end-of-game and tie-break conditions for `room` (§4.4).
pub fn evaluate_round_outcome(room: &Room) -> RoundOutcome {
    let top = room.top_score();
    let top_players = room.top_scorers();
    let end_of_rounds = room.current_round >= room.max_rounds;
    let score_reached = top >= room.max_score;

    if end_of_rounds || score_reached {
        match top_players.as_slice() {
            [single] => RoundOutcome::GameOver(*single),
            _ => RoundOutcome::TieBreaker(top_players),
        }
    } else {
        RoundOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::participant::Participant;
    use crate::protocol::types::Appearance;
    use chrono::Utc;
    use uuid::Uuid;

    fn participant_with_score(score: u32) -> Participant {
        let mut p = Participant::new(
            Uuid::new_v4(),
            "p".into(),
            Appearance {
                color: "teal",
                emoji: "🐙",
            },
            false,
        );
        p.score = score;
        p
    }

    #[test]
    fn continues_before_limits_reached() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        room.max_rounds = 5;
        room.max_score = 10;
        room.current_round = 2;
        room.add_participant(participant_with_score(1));
        assert_eq!(evaluate_round_outcome(&room), RoundOutcome::Continue);
    }

    #[test]
    fn game_over_on_single_top_scorer_at_round_limit() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        room.max_rounds = 2;
        room.max_score = 10;
        room.current_round = 2;
        let winner = participant_with_score(3);
        let winner_id = winner.id;
        room.add_participant(winner);
        room.add_participant(participant_with_score(1));
        assert_eq!(evaluate_round_outcome(&room), RoundOutcome::GameOver(winner_id));
    }

    #[test]
    fn tie_breaker_on_shared_top_score() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        room.max_rounds = 2;
        room.max_score = 10;
        room.current_round = 2;
        room.add_participant(participant_with_score(2));
        room.add_participant(participant_with_score(2));
        room.add_participant(participant_with_score(0));
        match evaluate_round_outcome(&room) {
            RoundOutcome::TieBreaker(tied) => assert_eq!(tied.len(), 2),
            other => panic!("expected tie breaker, got {other:?}"),
        }
    }

    #[test]
    fn game_over_on_score_limit_before_round_limit() {
        let mut room = Room::new("ABCD".into(), Utc::now());
        room.max_rounds = 20;
        room.max_score = 3;
        room.current_round = 1;
        let winner = participant_with_score(3);
        let winner_id = winner.id;
        room.add_participant(winner);
        room.add_participant(participant_with_score(0));
        assert_eq!(evaluate_round_outcome(&room), RoundOutcome::GameOver(winner_id));
    }
}
