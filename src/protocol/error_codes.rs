use serde::{Deserialize, Serialize};

/// Structured error codes reported to clients alongside `ServerMessage::Error`
/// or a failed join/reconnect ack (§7 Error taxonomy).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    InvalidInput,
    InvalidRoomCode,
    InvalidParticipantName,
    InvalidSubmission,
    InvalidSettings,

    // Phase / role errors
    WrongPhase,
    NotHost,
    NotJudge,
    NotPrimaryViewer,
    JudgeCannotSubmit,
    AlreadySubmitted,

    // Capacity / lookup errors
    RoomNotFound,
    RoomFull,
    NameTaken,
    NotInRoom,
    ParticipantNotFound,

    // Reconnection errors
    ReconnectionFailed,

    // Server errors
    InternalError,
}

impl ErrorCode {
    /// Human-readable description of this error code, suitable for logging
    /// or for SDKs that want to display something more specific than the
    /// accompanying message.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The request payload was malformed.",
            Self::InvalidRoomCode => "Room codes are four uppercase letters.",
            Self::InvalidParticipantName => "Participant name is empty, too long, or taken.",
            Self::InvalidSubmission => "Submissions must contain one or two sound ids.",
            Self::InvalidSettings => "Game settings are outside the allowed bounds.",
            Self::WrongPhase => "This action is not valid in the room's current phase.",
            Self::NotHost => "Only the room host may perform this action.",
            Self::NotJudge => "Only the current judge may perform this action.",
            Self::NotPrimaryViewer => "Only the primary viewer may perform this action.",
            Self::JudgeCannotSubmit => "The judge does not submit sounds.",
            Self::AlreadySubmitted => "This participant has already submitted this round.",
            Self::RoomNotFound => "No room exists with that code.",
            Self::RoomFull => "The room has reached its participant limit.",
            Self::NameTaken => "Another active participant already uses that name.",
            Self::NotInRoom => "You are not currently a member of a room.",
            Self::ParticipantNotFound => "The referenced participant could not be found.",
            Self::ReconnectionFailed => "No matching disconnection record was found.",
            Self::InternalError => "An internal server error occurred.",
        }
    }
}
