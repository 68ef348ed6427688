use tracing::{debug, info};

use super::{FlowOutput, GameFlow, PhaseTimer, TimerKind};
use crate::domain::declaration::expected_declarer;
use crate::domain::game_transition::DomainEvent;
use crate::domain::phases::PhaseState;
use crate::domain::redeal::RedealResolution;
use crate::domain::state::GamePhase;
use crate::domain::tricks::{resolve_turn, start_turn};
use crate::errors::domain::DomainError;

/// Upper bound on transitions chained by one mutation.
const MAX_CHAINED_TRANSITIONS: usize = 64;

impl GameFlow {
    /// The phase the game should move to right now, if any.
    pub(super) fn check_transition_conditions(&self) -> Option<GamePhase> {
        match &self.phase {
            PhaseState::Waiting | PhaseState::GameOver { .. } => None,
            PhaseState::Preparation { vote: None } => Some(GamePhase::Declaration),
            PhaseState::Preparation { vote: Some(vote) } => match vote.resolution()? {
                RedealResolution::Redeal { .. } => Some(GamePhase::Preparation),
                RedealResolution::Proceed => Some(GamePhase::Declaration),
            },
            PhaseState::Declaration => {
                expected_declarer(&self.state).is_none().then_some(GamePhase::Turn)
            }
            PhaseState::Turn => self
                .state
                .turn
                .as_ref()
                .filter(|t| t.is_complete())
                .map(|_| GamePhase::TurnResults),
            PhaseState::TurnResults { .. } if self.config.turn_results_delay.is_zero() => {
                self.phase.next_phases().first().copied()
            }
            PhaseState::Scoring { .. } if self.config.scoring_delay.is_zero() => {
                self.phase.next_phases().first().copied()
            }
            PhaseState::TurnResults { .. } | PhaseState::Scoring { .. } => None,
        }
    }

    /// Apply one validated transition and broadcast the new phase.
    pub(super) fn transition(
        &mut self,
        next: GamePhase,
        out: &mut FlowOutput,
    ) -> Result<(), DomainError> {
        let from = self.phase();
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::invariant(format!(
                "illegal transition {from} -> {next}"
            )));
        }

        match (&self.phase, next) {
            (PhaseState::Waiting, GamePhase::Preparation) => self.begin_round()?,
            (PhaseState::Preparation { vote }, GamePhase::Preparation) => {
                let requester = match vote.as_ref().and_then(|v| v.resolution()) {
                    Some(RedealResolution::Redeal { requester }) => requester,
                    _ => {
                        return Err(DomainError::invariant(
                            "redeal without an accepting vote",
                        ))
                    }
                };
                self.apply_redeal(requester, out)?;
            }
            (PhaseState::Preparation { .. }, GamePhase::Declaration) => {
                self.phase = PhaseState::Declaration;
            }
            (PhaseState::Declaration, GamePhase::Turn) => self.begin_play()?,
            (PhaseState::Turn, GamePhase::TurnResults) => {
                let resolution = resolve_turn(&mut self.state)?;
                out.events.push(DomainEvent::TurnResolved {
                    turn_number: resolution.turn_number,
                    winner: self.state.player(resolution.winner).name.clone(),
                    piles: resolution.piles_awarded,
                });
                self.phase = PhaseState::TurnResults { resolution };
            }
            (PhaseState::TurnResults { resolution }, GamePhase::Turn) => {
                let winner = resolution.winner;
                start_turn(&mut self.state, winner);
                self.phase = PhaseState::Turn;
            }
            (PhaseState::TurnResults { .. }, GamePhase::Scoring) => self.score_round(out)?,
            (PhaseState::Scoring { winners: Some(winners), .. }, GamePhase::Preparation) => {
                return Err(DomainError::invariant(format!(
                    "game already won by seats {winners:?}"
                )));
            }
            (PhaseState::Scoring { .. }, GamePhase::Preparation) => self.begin_round()?,
            (PhaseState::Scoring { winners, .. }, GamePhase::GameOver) => {
                let winners = winners.clone().unwrap_or_default();
                self.phase = PhaseState::GameOver { winners };
            }
            (_, next) => {
                return Err(DomainError::invariant(format!(
                    "no handler for {from} -> {next}"
                )))
            }
        }

        self.epoch += 1;
        out.events.push(DomainEvent::PhaseChanged {
            from,
            to: self.phase(),
        });
        self.emit(out);
        info!(
            room_id = %self.room_id,
            from = %from,
            to = %self.phase(),
            round_number = self.state.round.round_number,
            version = self.version,
            "Phase transition"
        );
        Ok(())
    }

    /// Apply every transition that is due, in order.
    pub(super) fn advance(&mut self, out: &mut FlowOutput) -> Result<(), DomainError> {
        for _ in 0..MAX_CHAINED_TRANSITIONS {
            match self.check_transition_conditions() {
                Some(next) => self.transition(next, out)?,
                None => return Ok(()),
            }
        }
        Err(DomainError::invariant(format!(
            "more than {MAX_CHAINED_TRANSITIONS} chained transitions from one mutation"
        )))
    }

    /// Timer the room loop should arm for the current phase instance.
    pub fn pending_timer(&self) -> Option<PhaseTimer> {
        let (kind, delay) = match &self.phase {
            PhaseState::Preparation { vote: Some(vote) } if !vote.is_complete() => {
                (TimerKind::RedealTimeout, self.config.redeal_timeout)
            }
            PhaseState::TurnResults { .. } if !self.config.turn_results_delay.is_zero() => {
                (TimerKind::TurnResultsDisplay, self.config.turn_results_delay)
            }
            PhaseState::Scoring { .. } if !self.config.scoring_delay.is_zero() => {
                (TimerKind::ScoringDisplay, self.config.scoring_delay)
            }
            _ => return None,
        };
        Some(PhaseTimer {
            kind,
            delay,
            epoch: self.epoch,
        })
    }

    /// Fire a previously armed timer. A timer for a phase instance that has
    /// already ended produces an empty output.
    pub fn fire_timer(&mut self, timer: PhaseTimer) -> Result<FlowOutput, DomainError> {
        self.ensure_not_failed()?;
        if timer.epoch != self.epoch {
            debug!(
                room_id = %self.room_id,
                kind = ?timer.kind,
                "Ignoring stale timer"
            );
            return Ok(FlowOutput::default());
        }

        self.run_mutation(|flow, out| match timer.kind {
            TimerKind::RedealTimeout => {
                let Some(vote) = flow.phase.redeal_vote_mut() else {
                    return Ok(());
                };
                let defaulted = vote.default_pending_to_decline();
                if !defaulted.is_empty() {
                    info!(
                        room_id = %flow.room_id,
                        seats = ?defaulted,
                        "Redeal vote timed out; silent players decline"
                    );
                    flow.emit(out);
                }
                flow.advance(out)
            }
            TimerKind::TurnResultsDisplay | TimerKind::ScoringDisplay => {
                let expected = match timer.kind {
                    TimerKind::TurnResultsDisplay => GamePhase::TurnResults,
                    _ => GamePhase::Scoring,
                };
                if flow.phase() != expected {
                    return Ok(());
                }
                let next = flow.phase.next_phases().first().copied().ok_or_else(|| {
                    DomainError::invariant(format!("{expected} has no successor"))
                })?;
                flow.transition(next, out)?;
                flow.advance(out)
            }
        })
    }
}
