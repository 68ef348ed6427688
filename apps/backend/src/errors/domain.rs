//! Domain-level error type used across the game flow and the room layer.
//!
//! This error type is transport-agnostic. The room layer never lets a
//! `DomainError` escape as a panic; it is folded into an `ActionResult`
//! so the connection layer can translate it for its own protocol.

use serde::Serialize;
use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// Coarse taxonomy reported back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Wrong phase, wrong actor, malformed payload. Recoverable, no state change.
    InvalidAction,
    /// Game rule refused the move. Recoverable, no state change.
    RuleViolation,
    /// Stale or duplicate submission. Recoverable, treated as a no-op.
    Concurrency,
    /// Internal corruption. Fatal for the room that raised it.
    InvariantViolation,
    /// Room does not exist, was closed, or has failed.
    Room,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidActionKind {
    PhaseMismatch,
    ActionNotAllowed,
    OutOfTurn,
    UnknownPlayer,
    MalformedPayload,
    NotEligible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleKind {
    DeclarationOutOfRange,
    ForbiddenTotal,
    ZeroStreak,
    WrongPieceCount,
    PieceNotInHand,
    InvalidCombo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    StaleVersion,
    DuplicateDeclaration,
    DuplicateResponse,
    AlreadyPlayed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoomErrorKind {
    NotFound,
    AlreadyExists,
    Closed,
    Failed,
    QueueFull,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid action {0:?}: {1}")]
    InvalidAction(InvalidActionKind, String),
    #[error("rule violation {0:?}: {1}")]
    RuleViolation(RuleKind, String),
    #[error("concurrency conflict {0:?}: {1}")]
    Concurrency(ConflictKind, String),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("room error {0:?}: {1}")]
    Room(RoomErrorKind, String),
}

impl DomainError {
    pub fn invalid(kind: InvalidActionKind, detail: impl Into<String>) -> Self {
        Self::InvalidAction(kind, detail.into())
    }

    pub fn rule(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::RuleViolation(kind, detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Concurrency(kind, detail.into())
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::Invariant(detail.into())
    }

    pub fn room(kind: RoomErrorKind, detail: impl Into<String>) -> Self {
        Self::Room(kind, detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidAction(..) => ErrorKind::InvalidAction,
            DomainError::RuleViolation(..) => ErrorKind::RuleViolation,
            DomainError::Concurrency(..) => ErrorKind::Concurrency,
            DomainError::Invariant(_) => ErrorKind::InvariantViolation,
            DomainError::Room(..) => ErrorKind::Room,
        }
    }

    /// True when the room that produced this error must stop processing.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Invariant(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::InvalidAction(kind, _) => match kind {
                InvalidActionKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                InvalidActionKind::ActionNotAllowed => ErrorCode::ActionNotAllowed,
                InvalidActionKind::OutOfTurn => ErrorCode::OutOfTurn,
                InvalidActionKind::UnknownPlayer => ErrorCode::UnknownPlayer,
                InvalidActionKind::MalformedPayload => ErrorCode::MalformedPayload,
                InvalidActionKind::NotEligible => ErrorCode::NotEligible,
            },
            DomainError::RuleViolation(kind, _) => match kind {
                RuleKind::DeclarationOutOfRange => ErrorCode::DeclarationOutOfRange,
                RuleKind::ForbiddenTotal => ErrorCode::ForbiddenDeclarationTotal,
                RuleKind::ZeroStreak => ErrorCode::ZeroDeclarationStreak,
                RuleKind::WrongPieceCount => ErrorCode::WrongPieceCount,
                RuleKind::PieceNotInHand => ErrorCode::PieceNotInHand,
                RuleKind::InvalidCombo => ErrorCode::InvalidCombo,
            },
            DomainError::Concurrency(kind, _) => match kind {
                ConflictKind::StaleVersion => ErrorCode::StaleVersion,
                ConflictKind::DuplicateDeclaration => ErrorCode::DuplicateDeclaration,
                ConflictKind::DuplicateResponse => ErrorCode::DuplicateRedealResponse,
                ConflictKind::AlreadyPlayed => ErrorCode::AlreadyPlayed,
            },
            DomainError::Invariant(_) => ErrorCode::InvariantViolation,
            DomainError::Room(kind, _) => match kind {
                RoomErrorKind::NotFound => ErrorCode::RoomNotFound,
                RoomErrorKind::AlreadyExists => ErrorCode::RoomAlreadyExists,
                RoomErrorKind::Closed => ErrorCode::RoomClosed,
                RoomErrorKind::Failed => ErrorCode::RoomFailed,
                RoomErrorKind::QueueFull => ErrorCode::QueueFull,
            },
        }
    }

    /// Human-readable detail without the taxonomy prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::InvalidAction(_, d)
            | DomainError::RuleViolation(_, d)
            | DomainError::Concurrency(_, d)
            | DomainError::Invariant(d)
            | DomainError::Room(_, d) => d,
        }
    }
}
