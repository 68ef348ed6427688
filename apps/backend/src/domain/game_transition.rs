use serde::Serialize;

use crate::domain::state::GamePhase;

/// Minimal lifecycle facts compared before and after each applied action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleView {
    pub version: u64,
    pub phase: GamePhase,
    pub round_number: u16,
    /// Player whose move it is, outside simultaneous sub-phases.
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    /// Explicit: one phase transition was applied.
    PhaseChanged { from: GamePhase, to: GamePhase },

    /// Edge-triggered: a new round number was dealt.
    RoundStarted { round_number: u16, starter: String },

    /// Edge-triggered: the acting focus moved to a specific player.
    ActorBecame { player: String },

    /// Explicit: a weak-hand vote ended in a redeal.
    RedealAccepted { requester: String, multiplier: u8 },

    /// Explicit: a complete turn was awarded.
    TurnResolved {
        turn_number: u8,
        winner: String,
        piles: u8,
    },

    /// Explicit: round deltas were applied.
    RoundEnded {
        round_number: u16,
        deltas: Vec<(String, i32)>,
    },

    /// Edge-triggered: the game reached GAME_OVER.
    GameEnded,
}

impl DomainEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            DomainEvent::PhaseChanged { .. } => "PhaseChanged",
            DomainEvent::RoundStarted { .. } => "RoundStarted",
            DomainEvent::ActorBecame { .. } => "ActorBecame",
            DomainEvent::RedealAccepted { .. } => "RedealAccepted",
            DomainEvent::TurnResolved { .. } => "TurnResolved",
            DomainEvent::RoundEnded { .. } => "RoundEnded",
            DomainEvent::GameEnded => "GameEnded",
        }
    }
}

/// Derive edge-triggered events from before/after lifecycle views.
///
/// `starter` names the round starter in the after state; it is only used
/// when a new round began. Phase changes are reported explicitly by the
/// orchestrator since one mutation may pass through several phases.
pub fn derive_transitions(
    before: &LifecycleView,
    after: &LifecycleView,
    starter: &str,
) -> Vec<DomainEvent> {
    let mut events = Vec::new();

    if after.round_number > before.round_number {
        events.push(DomainEvent::RoundStarted {
            round_number: after.round_number,
            starter: starter.to_owned(),
        });
    }

    if let Some(player) = &after.actor {
        if before.actor.as_ref() != Some(player) {
            events.push(DomainEvent::ActorBecame {
                player: player.clone(),
            });
        }
    }

    if before.phase != GamePhase::GameOver && after.phase == GamePhase::GameOver {
        events.push(DomainEvent::GameEnded);
    }

    events
}
