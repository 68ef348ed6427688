use tracing::{debug, info};

use super::{FlowOutput, GameFlow};
use crate::domain::declaration::place_declaration;
use crate::domain::redeal::RedealChoice;
use crate::domain::state::{GamePhase, Seat};
use crate::domain::tricks::play_pieces;
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind};
use crate::protocol::{ActionPayload, GameAction};

impl GameFlow {
    /// Validate and apply one player action, then run every transition it
    /// made due. A rejected action leaves the flow untouched.
    pub fn handle_action(&mut self, action: &GameAction) -> Result<FlowOutput, DomainError> {
        self.ensure_not_failed()?;
        let seat = self.admit(action)?;

        let out = self.run_mutation(|flow, out| {
            match &action.payload {
                ActionPayload::StartGame => {
                    flow.transition(GamePhase::Preparation, out)?;
                    return flow.advance(out);
                }
                ActionPayload::Declare { value } => {
                    let outcome = place_declaration(
                        &mut flow.state,
                        seat,
                        *value,
                        flow.config.max_zero_streak,
                    )?;
                    debug!(
                        room_id = %flow.room_id,
                        seat,
                        value = outcome.value,
                        next = ?outcome.next_declarer,
                        "Declaration placed"
                    );
                }
                ActionPayload::PlayPieces { pieces } => {
                    let outcome = play_pieces(&mut flow.state, seat, pieces)?;
                    debug!(
                        room_id = %flow.room_id,
                        seat,
                        count = pieces.len(),
                        combo = ?outcome.combo.map(|c| c.kind),
                        turn_complete = outcome.turn_complete,
                        "Pieces played"
                    );
                }
                ActionPayload::RedealResponse { accept } => {
                    let choice = if *accept {
                        RedealChoice::Accept
                    } else {
                        RedealChoice::Decline
                    };
                    let vote = flow.phase.redeal_vote_mut().ok_or_else(|| {
                        DomainError::invariant("redeal response admitted without an open vote")
                    })?;
                    vote.record(seat, choice)?;
                }
            }
            flow.emit(out);
            flow.advance(out)
        })?;

        info!(
            room_id = %self.room_id,
            player = %action.player_name,
            action = %action.action_type(),
            version = self.version,
            phase = %self.phase(),
            "Action applied"
        );
        Ok(out)
    }

    /// Read-only admission checks shared by every action type.
    fn admit(&self, action: &GameAction) -> Result<Seat, DomainError> {
        if let Some(expected) = action.expected_version {
            if expected != self.version {
                return Err(DomainError::conflict(
                    ConflictKind::StaleVersion,
                    format!("expected version {expected}, room is at {}", self.version),
                ));
            }
        }

        let seat = self.state.seat_of(&action.player_name)?;
        let action_type = action.action_type();
        let allowed = self.phase.allowed_actions();
        if allowed.is_empty() {
            return Err(DomainError::invalid(
                InvalidActionKind::PhaseMismatch,
                format!("{} accepts no actions", self.phase()),
            ));
        }
        if !allowed.contains(&action_type) {
            return Err(DomainError::invalid(
                InvalidActionKind::ActionNotAllowed,
                format!("{action_type} is not allowed during {}", self.phase()),
            ));
        }
        if let Some(vote) = self.phase.redeal_vote() {
            vote.validate(seat)?;
        }
        Ok(seat)
    }
}
