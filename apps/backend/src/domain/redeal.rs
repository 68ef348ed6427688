//! Weak-hand redeal negotiation.
//!
//! All weak-hand holders decide at once. The vote resolves only when every
//! eligible seat has answered (or has been defaulted to decline on timeout).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::dealing::is_weak_hand;
use crate::domain::state::{turn_order, GameState, Seat};
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedealChoice {
    Accept,
    Decline,
}

/// What the table does once every weak seat has answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedealResolution {
    /// Deal again; `requester` starts the new deal.
    Redeal { requester: Seat },
    /// Nobody accepted; declarations may begin.
    Proceed,
}

/// Weak-hand holders in turn order from the round starter.
pub fn weak_seats(state: &GameState) -> Vec<Seat> {
    turn_order(state.round.round_starter)
        .into_iter()
        .filter(|&seat| is_weak_hand(&state.player(seat).hand))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedealVote {
    /// Eligible seats in turn order.
    eligible: Vec<Seat>,
    responses: BTreeMap<Seat, RedealChoice>,
}

impl RedealVote {
    pub fn open(eligible: Vec<Seat>) -> Self {
        Self {
            eligible,
            responses: BTreeMap::new(),
        }
    }

    pub fn eligible(&self) -> &[Seat] {
        &self.eligible
    }

    pub fn responses(&self) -> &BTreeMap<Seat, RedealChoice> {
        &self.responses
    }

    /// Eligible seats that have not answered yet.
    pub fn pending(&self) -> Vec<Seat> {
        self.eligible
            .iter()
            .copied()
            .filter(|s| !self.responses.contains_key(s))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.eligible.iter().all(|s| self.responses.contains_key(s))
    }

    /// Check a response without recording it.
    pub fn validate(&self, seat: Seat) -> Result<(), DomainError> {
        if !self.eligible.contains(&seat) {
            return Err(DomainError::invalid(
                InvalidActionKind::NotEligible,
                format!("seat {seat} does not hold a weak hand"),
            ));
        }
        if self.responses.contains_key(&seat) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateResponse,
                format!("seat {seat} already answered the redeal vote"),
            ));
        }
        Ok(())
    }

    pub fn record(&mut self, seat: Seat, choice: RedealChoice) -> Result<(), DomainError> {
        self.validate(seat)?;
        self.responses.insert(seat, choice);
        Ok(())
    }

    /// Mark every silent seat as declining. Returns the seats defaulted.
    pub fn default_pending_to_decline(&mut self) -> Vec<Seat> {
        let pending = self.pending();
        for &seat in &pending {
            self.responses.insert(seat, RedealChoice::Decline);
        }
        pending
    }

    /// `None` while responses are outstanding.
    pub fn resolution(&self) -> Option<RedealResolution> {
        if !self.is_complete() {
            return None;
        }
        let requester = self
            .eligible
            .iter()
            .copied()
            .find(|s| self.responses.get(s) == Some(&RedealChoice::Accept));
        Some(match requester {
            Some(requester) => RedealResolution::Redeal { requester },
            None => RedealResolution::Proceed,
        })
    }
}
