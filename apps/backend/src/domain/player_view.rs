//! What one player can see at a decision point.
//!
//! This is the contract between the state machine and bot policies. It
//! carries the public phase data, the player's own hand, their `declared`
//! and `captured` counts, and precomputed legal moves so a policy never has
//! to re-implement the rules.

use serde::Serialize;

use crate::domain::declaration::{expected_declarer, legal_declarations};
use crate::domain::phases::{ActionType, PhaseState};
use crate::domain::redeal::RedealVote;
use crate::domain::snapshot::{phase_data, PhaseData};
use crate::domain::state::{GamePhase, GameState, Seat};
use crate::domain::tricks::legal_plays;
use crate::domain::Piece;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub phase: GamePhase,
    pub seat: Seat,
    pub player_name: String,
    pub hand: Vec<Piece>,
    pub declared: Option<u8>,
    pub captured: u8,
    /// Action this player is expected to take now, if any.
    pub expected_action: Option<ActionType>,
    pub phase_data: PhaseData,
    pub legal_declarations: Vec<u8>,
    /// Piece sets the player may submit; lead-kind combos first.
    pub legal_plays: Vec<Vec<Piece>>,
    /// Required piece count of the open turn, once led.
    pub required_piece_count: Option<u8>,
}

impl PlayerView {
    pub fn build(state: &GameState, phase: &PhaseState, seat: Seat, max_zero_streak: u8) -> Self {
        let player = state.player(seat);
        let expected_action = expected_action(state, phase, seat);
        let legal_declarations = if expected_action == Some(ActionType::Declare) {
            legal_declarations(state, seat, max_zero_streak)
        } else {
            Vec::new()
        };
        let legal_plays = if expected_action == Some(ActionType::PlayPieces) {
            legal_plays(state, seat)
        } else {
            Vec::new()
        };

        Self {
            phase: phase.phase(),
            seat,
            player_name: player.name.clone(),
            hand: player.hand.clone(),
            declared: player.declared,
            captured: player.captured_piles,
            expected_action,
            phase_data: phase_data(state, phase),
            legal_declarations,
            legal_plays,
            required_piece_count: state.turn.as_ref().and_then(|t| t.required_piece_count),
        }
    }

    /// True once the player has captured at least what they declared.
    pub fn at_target(&self) -> bool {
        matches!(self.declared, Some(d) if self.captured >= d)
    }

    pub fn is_leading(&self) -> bool {
        self.expected_action == Some(ActionType::PlayPieces) && self.required_piece_count.is_none()
    }
}

/// The action `seat` owes the game right now, if it is their move.
pub fn expected_action(state: &GameState, phase: &PhaseState, seat: Seat) -> Option<ActionType> {
    match phase {
        PhaseState::Preparation { vote: Some(vote) } => {
            awaiting_redeal_response(vote, seat).then_some(ActionType::RedealResponse)
        }
        PhaseState::Declaration => {
            (expected_declarer(state) == Some(seat)).then_some(ActionType::Declare)
        }
        PhaseState::Turn => {
            let current = state.turn.as_ref().and_then(|t| t.expected_player());
            (current == Some(seat)).then_some(ActionType::PlayPieces)
        }
        _ => None,
    }
}

fn awaiting_redeal_response(vote: &RedealVote, seat: Seat) -> bool {
    vote.pending().contains(&seat)
}
