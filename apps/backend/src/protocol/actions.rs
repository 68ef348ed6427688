use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::phases::ActionType;
use crate::domain::snapshot::PhaseUpdate;
use crate::domain::Piece;
use crate::errors::domain::DomainError;
use crate::errors::{ErrorCode, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPayload {
    StartGame,
    /// Signed so out-of-range input reaches the validator intact.
    Declare { value: i16 },
    PlayPieces { pieces: Vec<Piece> },
    RedealResponse { accept: bool },
}

impl ActionPayload {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionPayload::StartGame => ActionType::StartGame,
            ActionPayload::Declare { .. } => ActionType::Declare,
            ActionPayload::PlayPieces { .. } => ActionType::PlayPieces,
            ActionPayload::RedealResponse { .. } => ActionType::RedealResponse,
        }
    }
}

/// The only mutation entrypoint into a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameAction {
    pub player_name: String,
    pub payload: ActionPayload,
    pub timestamp: OffsetDateTime,
    /// Room version the sender last observed; stale values are refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl GameAction {
    pub fn new(player_name: impl Into<String>, payload: ActionPayload) -> Self {
        Self {
            player_name: player_name.into(),
            payload,
            timestamp: OffsetDateTime::now_utc(),
            expected_version: None,
        }
    }

    pub fn start_game(player_name: impl Into<String>) -> Self {
        Self::new(player_name, ActionPayload::StartGame)
    }

    pub fn declare(player_name: impl Into<String>, value: i16) -> Self {
        Self::new(player_name, ActionPayload::Declare { value })
    }

    pub fn play(player_name: impl Into<String>, pieces: Vec<Piece>) -> Self {
        Self::new(player_name, ActionPayload::PlayPieces { pieces })
    }

    pub fn redeal_response(player_name: impl Into<String>, accept: bool) -> Self {
        Self::new(player_name, ActionPayload::RedealResponse { accept })
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn action_type(&self) -> ActionType {
        self.payload.action_type()
    }
}

/// Error reported back to the submitter as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionError {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<&DomainError> for ActionError {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code(),
            kind: err.kind(),
            detail: err.detail().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_snapshot: Option<PhaseUpdate>,
}

impl ActionResult {
    pub fn ok(snapshot: PhaseUpdate) -> Self {
        Self {
            success: true,
            error: None,
            phase_snapshot: Some(snapshot),
        }
    }

    pub fn rejected(err: &DomainError, snapshot: Option<PhaseUpdate>) -> Self {
        Self {
            success: false,
            error: Some(err.into()),
            phase_snapshot: snapshot,
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }
}
