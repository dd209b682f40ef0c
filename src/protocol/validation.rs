use super::error_codes::ErrorCode;
use super::types::DEFAULT_MAX_PARTICIPANT_NAME_LENGTH;
use crate::config::GameConfig;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub code: ErrorCode,
}

impl ValidationError {
    fn new(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

/// Validate a requested display name: non-empty after trimming, bounded
/// length, no control characters.
pub fn validate_participant_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            "Name cannot be empty",
            ErrorCode::InvalidParticipantName,
        ));
    }
    if trimmed.chars().count() > DEFAULT_MAX_PARTICIPANT_NAME_LENGTH {
        return Err(ValidationError::new(
            format!(
                "Name must be at most {DEFAULT_MAX_PARTICIPANT_NAME_LENGTH} characters"
            ),
            ErrorCode::InvalidParticipantName,
        ));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "Name cannot contain control characters",
            ErrorCode::InvalidParticipantName,
        ));
    }
    Ok(())
}

/// Validate a room code shape (four uppercase letters) before even looking
/// it up in the room store.
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 4 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "Room codes are four uppercase letters",
            ErrorCode::InvalidRoomCode,
        ))
    }
}

/// Validate a `submitSounds` payload: 1-2 non-empty sound ids (§6).
pub fn validate_submission(sound_ids: &[String]) -> Result<(), ValidationError> {
    if sound_ids.is_empty() || sound_ids.len() > 2 {
        return Err(ValidationError::new(
            "Submissions must contain 1 or 2 sound ids",
            ErrorCode::InvalidSubmission,
        ));
    }
    if sound_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ValidationError::new(
            "Sound ids cannot be empty",
            ErrorCode::InvalidSubmission,
        ));
    }
    Ok(())
}

/// Validate `updateGameSettings` bounds: rounds 1-20, score 1-10 (§6).
pub fn validate_game_settings(
    max_rounds: u32,
    max_score: u32,
    config: &GameConfig,
) -> Result<(), ValidationError> {
    if !(config.min_rounds..=config.max_rounds_limit).contains(&max_rounds) {
        return Err(ValidationError::new(
            format!(
                "maxRounds must be between {} and {}",
                config.min_rounds, config.max_rounds_limit
            ),
            ErrorCode::InvalidSettings,
        ));
    }
    if !(config.min_score..=config.max_score_limit).contains(&max_score) {
        return Err(ValidationError::new(
            format!(
                "maxScore must be between {} and {}",
                config.min_score, config.max_score_limit
            ),
            ErrorCode::InvalidSettings,
        ));
    }
    Ok(())
}

/// Parse a `selectWinner` index string into a usize, bounded by the
/// submission count.
pub fn parse_winner_index(raw: &str, submission_count: usize) -> Result<usize, ValidationError> {
    let index: usize = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::new("Winner index must be numeric", ErrorCode::InvalidInput))?;
    if index >= submission_count {
        return Err(ValidationError::new(
            "Winner index out of range",
            ErrorCode::InvalidInput,
        ));
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::any;

    #[test]
    fn participant_name_trims_and_bounds() {
        assert!(validate_participant_name("Alice").is_ok());
        assert!(validate_participant_name("   ").is_err());
        assert!(validate_participant_name(&"x".repeat(25)).is_err());
    }

    #[test]
    fn room_code_shape() {
        assert!(validate_room_code("ABCD").is_ok());
        assert!(validate_room_code("abcd").is_err());
        assert!(validate_room_code("AB1D").is_err());
        assert!(validate_room_code("ABCDE").is_err());
    }

    #[test]
    fn submission_size_bounds() {
        assert!(validate_submission(&["s1".into()]).is_ok());
        assert!(validate_submission(&["s1".into(), "s2".into()]).is_ok());
        assert!(validate_submission(&[]).is_err());
        assert!(validate_submission(&["s1".into(), "s2".into(), "s3".into()]).is_err());
        assert!(validate_submission(&["".into()]).is_err());
    }

    #[test]
    fn settings_bounds() {
        let config = GameConfig::default();
        assert!(validate_game_settings(3, 5, &config).is_ok());
        assert!(validate_game_settings(0, 5, &config).is_err());
        assert!(validate_game_settings(21, 5, &config).is_err());
        assert!(validate_game_settings(3, 0, &config).is_err());
        assert!(validate_game_settings(3, 11, &config).is_err());
    }

    #[test]
    fn winner_index_parsing() {
        assert_eq!(parse_winner_index("1", 3).unwrap(), 1);
        assert!(parse_winner_index("abc", 3).is_err());
        assert!(parse_winner_index("5", 3).is_err());
    }

    fn expected_participant_name_ok(raw: &str) -> bool {
        let trimmed = raw.trim();
        !trimmed.is_empty()
            && trimmed.chars().count() <= DEFAULT_MAX_PARTICIPANT_NAME_LENGTH
            && !trimmed.chars().any(char::is_control)
    }

    fn expected_room_code_ok(raw: &str) -> bool {
        raw.len() == 4 && raw.chars().all(|c| c.is_ascii_uppercase())
    }

    proptest::proptest! {
        #[test]
        fn participant_name_validation_matches_predicate(raw in proptest::collection::vec(any::<char>(), 0..=48)) {
            let candidate: String = raw.into_iter().collect();
            proptest::prop_assert_eq!(
                validate_participant_name(&candidate).is_ok(),
                expected_participant_name_ok(&candidate)
            );
        }

        #[test]
        fn room_code_validation_matches_predicate(raw in proptest::collection::vec(any::<char>(), 0..=8)) {
            let candidate: String = raw.into_iter().collect();
            proptest::prop_assert_eq!(
                validate_room_code(&candidate).is_ok(),
                expected_room_code_ok(&candidate)
            );
        }
    }
}
