use serde::{Deserialize, Serialize};

use crate::domain::rules::TOTAL_PILES;
use crate::domain::state::{GameState, Seat};
use crate::errors::domain::DomainError;

/// Score table for one round. Deltas are multiplied by the round's redeal
/// multiplier before they reach a player's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Added to the declared value on an exact non-zero call.
    pub perfect_call_bonus: i32,
    /// Flat award for declaring zero and capturing nothing.
    pub zero_call_bonus: i32,
    /// Extra penalty for declaring zero and capturing anyway.
    pub zero_miss_penalty: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            perfect_call_bonus: 5,
            zero_call_bonus: 3,
            zero_miss_penalty: 0,
        }
    }
}

impl ScoringRules {
    /// Round delta before the redeal multiplier.
    pub fn raw_delta(&self, declared: u8, captured: u8) -> i32 {
        let declared = declared as i32;
        let captured = captured as i32;
        match (declared, captured) {
            (0, 0) => self.zero_call_bonus,
            (d, c) if d == c => d + self.perfect_call_bonus,
            (0, c) => -c - self.zero_miss_penalty,
            (d, c) => -(d - c).abs(),
        }
    }
}

/// One player's line in a completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub player_name: String,
    pub declared: u8,
    pub captured: u8,
    pub raw_delta: i32,
    pub delta: i32,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_number: u16,
    pub redeal_multiplier: u8,
    pub lines: Vec<ScoreLine>,
}

/// Apply per-round scoring to every player and append the round to history.
pub fn apply_round_scoring(
    state: &mut GameState,
    rules: &ScoringRules,
) -> Result<RoundRecord, DomainError> {
    let captured = state.total_captured();
    if captured != TOTAL_PILES {
        return Err(DomainError::invariant(format!(
            "round {} captured {captured} piles, expected {TOTAL_PILES}",
            state.round.round_number
        )));
    }

    if let Some(p) = state.players.iter().find(|p| p.declared.is_none()) {
        return Err(DomainError::invariant(format!(
            "{} reached scoring without a declaration",
            p.name
        )));
    }

    let multiplier = state.round.redeal_multiplier as i32;
    let mut lines = Vec::with_capacity(state.players.len());
    for player in &mut state.players {
        let declared = player.declared.unwrap_or_default();
        let raw = rules.raw_delta(declared, player.captured_piles);
        let delta = raw * multiplier;
        player.score += delta;
        lines.push(ScoreLine {
            player_name: player.name.clone(),
            declared,
            captured: player.captured_piles,
            raw_delta: raw,
            delta,
            total: player.score,
        });
    }

    let record = RoundRecord {
        round_number: state.round.round_number,
        redeal_multiplier: state.round.redeal_multiplier,
        lines,
    };
    state.history.push(record.clone());
    Ok(record)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCondition {
    pub win_score: i32,
    pub max_rounds: u16,
}

impl Default for WinCondition {
    fn default() -> Self {
        Self {
            win_score: 50,
            max_rounds: 20,
        }
    }
}

/// Winner seats when the game is over, `None` to keep playing.
pub fn check_game_over(state: &GameState, condition: &WinCondition) -> Option<Vec<Seat>> {
    let top = state.players.iter().map(|p| p.score).max()?;
    let reached_score = top >= condition.win_score;
    let reached_rounds = state.round.round_number >= condition.max_rounds;
    if !reached_score && !reached_rounds {
        return None;
    }
    Some(
        state
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.score == top)
            .map(|(i, _)| i as Seat)
            .collect(),
    )
}
