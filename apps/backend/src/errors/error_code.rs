//! Error codes reported back to the connection layer.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in `ActionResult` payloads.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Invalid actions
    /// Action submitted for a phase that is no longer active
    PhaseMismatch,
    /// Action type is not in the active phase's allowed set
    ActionNotAllowed,
    /// Acting player does not hold the turn
    OutOfTurn,
    /// Player name is not seated in the room
    UnknownPlayer,
    /// Payload could not be interpreted
    MalformedPayload,
    /// Player is not part of the current decision set
    NotEligible,

    // Rule violations
    /// Declaration outside 0..=8
    DeclarationOutOfRange,
    /// Last declaration would make the total equal the pile count
    ForbiddenDeclarationTotal,
    /// Zero declared too many rounds in a row
    ZeroDeclarationStreak,
    /// Play size differs from the turn's required piece count
    WrongPieceCount,
    /// Player does not hold the pieces played
    PieceNotInHand,
    /// Leading play is not a recognised combo
    InvalidCombo,

    // Concurrency
    /// Action was built against an older room version
    StaleVersion,
    /// Player already declared this round
    DuplicateDeclaration,
    /// Player already answered the redeal vote
    DuplicateRedealResponse,
    /// Player already played this turn
    AlreadyPlayed,

    // Room
    RoomNotFound,
    RoomAlreadyExists,
    RoomClosed,
    RoomFailed,
    QueueFull,

    // System
    /// Internal state corruption; the room was halted
    InvariantViolation,
    /// Configuration could not be loaded
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::ActionNotAllowed => "ACTION_NOT_ALLOWED",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::NotEligible => "NOT_ELIGIBLE",

            Self::DeclarationOutOfRange => "DECLARATION_OUT_OF_RANGE",
            Self::ForbiddenDeclarationTotal => "FORBIDDEN_DECLARATION_TOTAL",
            Self::ZeroDeclarationStreak => "ZERO_DECLARATION_STREAK",
            Self::WrongPieceCount => "WRONG_PIECE_COUNT",
            Self::PieceNotInHand => "PIECE_NOT_IN_HAND",
            Self::InvalidCombo => "INVALID_COMBO",

            Self::StaleVersion => "STALE_VERSION",
            Self::DuplicateDeclaration => "DUPLICATE_DECLARATION",
            Self::DuplicateRedealResponse => "DUPLICATE_REDEAL_RESPONSE",
            Self::AlreadyPlayed => "ALREADY_PLAYED",

            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoomAlreadyExists => "ROOM_ALREADY_EXISTS",
            Self::RoomClosed => "ROOM_CLOSED",
            Self::RoomFailed => "ROOM_FAILED",
            Self::QueueFull => "QUEUE_FULL",

            Self::InvariantViolation => "INVARIANT_VIOLATION",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
