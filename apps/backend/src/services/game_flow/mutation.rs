use tracing::error;

use super::GameFlow;
use crate::domain::declaration::expected_declarer;
use crate::domain::game_transition::{derive_transitions, DomainEvent, LifecycleView};
use crate::domain::phases::PhaseState;
use crate::domain::rules::TOTAL_PILES;
use crate::domain::snapshot::PhaseUpdate;
use crate::domain::state::{GamePhase, GameState};
use crate::errors::domain::DomainError;

/// Everything one committed mutation produced, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlowOutput {
    /// Phase updates, strictly increasing in sequence.
    pub updates: Vec<PhaseUpdate>,
    pub events: Vec<DomainEvent>,
}

impl FlowOutput {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.events.is_empty()
    }

    pub fn last_update(&self) -> Option<&PhaseUpdate> {
        self.updates.last()
    }
}

/// Saved copy of all mutable flow fields.
struct Checkpoint {
    state: GameState,
    phase: PhaseState,
    version: u64,
    sequence: u64,
    epoch: u64,
}

impl GameFlow {
    /// Run `mutation` as one atomic step.
    ///
    /// On success the version is bumped, lifecycle events are derived from
    /// the before/after views and merged with the explicit ones. On failure
    /// every field is restored; an invariant failure also halts the flow.
    pub(super) fn run_mutation<F>(&mut self, mutation: F) -> Result<FlowOutput, DomainError>
    where
        F: FnOnce(&mut GameFlow, &mut FlowOutput) -> Result<(), DomainError>,
    {
        self.ensure_not_failed()?;

        let checkpoint = self.checkpoint();
        let before = self.lifecycle_view();
        self.version += 1;

        let mut out = FlowOutput::default();
        let result = mutation(self, &mut out).and_then(|()| self.check_invariants());

        if let Err(err) = result {
            self.restore(checkpoint);
            if err.is_fatal() {
                error!(
                    room_id = %self.room_id,
                    phase = %self.phase(),
                    error = %err,
                    "Invariant violated; halting game flow"
                );
                self.failed = Some(err.detail().to_owned());
            }
            return Err(err);
        }

        let after = self.lifecycle_view();
        let starter = &self.state.player(self.state.round.round_starter).name;
        let mut events = derive_transitions(&before, &after, starter);
        events.append(&mut out.events);
        out.events = events;
        Ok(out)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            state: self.state.clone(),
            phase: self.phase.clone(),
            version: self.version,
            sequence: self.sequence,
            epoch: self.epoch,
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.state = checkpoint.state;
        self.phase = checkpoint.phase;
        self.version = checkpoint.version;
        self.sequence = checkpoint.sequence;
        self.epoch = checkpoint.epoch;
    }

    pub(super) fn lifecycle_view(&self) -> LifecycleView {
        let actor = match &self.phase {
            PhaseState::Declaration => expected_declarer(&self.state),
            PhaseState::Turn => self.state.turn.as_ref().and_then(|t| t.expected_player()),
            _ => None,
        };
        LifecycleView {
            version: self.version,
            phase: self.phase(),
            round_number: self.state.round.round_number,
            actor: actor.map(|s| self.state.player(s).name.clone()),
        }
    }

    /// Structural checks run after every mutation.
    fn check_invariants(&self) -> Result<(), DomainError> {
        if self.phase() == GamePhase::Waiting {
            return Ok(());
        }
        self.state.check_piece_conservation()?;
        let captured = self.state.total_captured();
        if captured > TOTAL_PILES {
            return Err(DomainError::invariant(format!(
                "{captured} piles captured, only {TOTAL_PILES} in play"
            )));
        }
        Ok(())
    }
}
