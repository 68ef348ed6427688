//! Phase sum type: each variant carries only the working data it needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::redeal::RedealVote;
use crate::domain::scoring::RoundRecord;
use crate::domain::state::{GamePhase, Seat};
use crate::domain::tricks::TurnResolution;

/// Kinds of action a player can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    StartGame,
    Declare,
    PlayPieces,
    RedealResponse,
}

impl ActionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionType::StartGame => "START_GAME",
            ActionType::Declare => "DECLARE",
            ActionType::PlayPieces => "PLAY_PIECES",
            ActionType::RedealResponse => "REDEAL_RESPONSE",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseState {
    Waiting,
    /// Hands are dealt; `vote` is open while weak-hand holders decide.
    Preparation { vote: Option<RedealVote> },
    Declaration,
    Turn,
    TurnResults { resolution: TurnResolution },
    /// `winners` is set when this round ended the game.
    Scoring {
        record: RoundRecord,
        winners: Option<Vec<Seat>>,
    },
    GameOver { winners: Vec<Seat> },
}

impl PhaseState {
    pub fn phase(&self) -> GamePhase {
        match self {
            PhaseState::Waiting => GamePhase::Waiting,
            PhaseState::Preparation { .. } => GamePhase::Preparation,
            PhaseState::Declaration => GamePhase::Declaration,
            PhaseState::Turn => GamePhase::Turn,
            PhaseState::TurnResults { .. } => GamePhase::TurnResults,
            PhaseState::Scoring { .. } => GamePhase::Scoring,
            PhaseState::GameOver { .. } => GamePhase::GameOver,
        }
    }

    /// Action types accepted while this phase is active.
    pub fn allowed_actions(&self) -> &'static [ActionType] {
        match self {
            PhaseState::Waiting => &[ActionType::StartGame],
            PhaseState::Preparation { vote: Some(_) } => &[ActionType::RedealResponse],
            PhaseState::Declaration => &[ActionType::Declare],
            PhaseState::Turn => &[ActionType::PlayPieces],
            PhaseState::Preparation { vote: None }
            | PhaseState::TurnResults { .. }
            | PhaseState::Scoring { .. }
            | PhaseState::GameOver { .. } => &[],
        }
    }

    pub fn allows(&self, action: ActionType) -> bool {
        self.allowed_actions().contains(&action)
    }

    /// Legal successors of this concrete phase instance.
    pub fn next_phases(&self) -> Vec<GamePhase> {
        match self {
            PhaseState::Waiting => vec![GamePhase::Preparation],
            // A redeal restarts preparation in place.
            PhaseState::Preparation { .. } => vec![GamePhase::Preparation, GamePhase::Declaration],
            PhaseState::Declaration => vec![GamePhase::Turn],
            PhaseState::Turn => vec![GamePhase::TurnResults],
            PhaseState::TurnResults { resolution } if resolution.round_complete => {
                vec![GamePhase::Scoring]
            }
            PhaseState::TurnResults { .. } => vec![GamePhase::Turn],
            PhaseState::Scoring {
                winners: Some(_), ..
            } => vec![GamePhase::GameOver],
            PhaseState::Scoring { winners: None, .. } => vec![GamePhase::Preparation],
            PhaseState::GameOver { .. } => Vec::new(),
        }
    }

    pub fn can_transition_to(&self, next: GamePhase) -> bool {
        self.next_phases().contains(&next)
    }

    pub fn redeal_vote(&self) -> Option<&RedealVote> {
        match self {
            PhaseState::Preparation { vote } => vote.as_ref(),
            _ => None,
        }
    }

    pub fn redeal_vote_mut(&mut self) -> Option<&mut RedealVote> {
        match self {
            PhaseState::Preparation { vote } => vote.as_mut(),
            _ => None,
        }
    }
}
