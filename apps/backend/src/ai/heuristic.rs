//! Heuristic - a deterministic baseline bot that avoids overcapturing.
//!
//! Redeal:
//! - Accept when the hand holds fewer than two pieces of CHARIOT strength or
//!   better.
//!
//! Declaration:
//! - Estimate one pile per piece at ELEPHANT_RED strength or above, plus one
//!   per strong pair.
//! - Choose the closest legal value to the estimate, biased downward.
//!
//! Play:
//! - Once `captured >= declared`, shed: play the weakest legal set and never
//!   try to win. When the only legal set is itself a winning combo (a lone
//!   SOLDIER_BLACK lead, for instance) it is played anyway; there is no
//!   weaker piece available.
//! - Below target as leader: lead the strongest combo that does not exceed
//!   the piles still needed.
//! - Below target as follower: win as cheaply as possible, else shed.

use crate::ai::{AiError, BotPolicy};
use crate::domain::combos::{evaluate, Combo};
use crate::domain::snapshot::PhaseData;
use crate::domain::{Piece, PlayerView};

#[derive(Clone, Debug, Default)]
pub struct Heuristic;

impl Heuristic {
    pub const NAME: &'static str = "Heuristic";
    pub const VERSION: &'static str = "1.0.0";

    const STRONG: u8 = 10;
    const USEFUL: u8 = 7;

    pub fn new() -> Self {
        Self
    }

    fn estimate_piles(hand: &[Piece]) -> u8 {
        let strong = hand.iter().filter(|p| p.strength() >= Self::STRONG).count();
        let mut sorted = hand.to_vec();
        sorted.sort();
        let strong_pairs = sorted
            .windows(2)
            .filter(|w| w[0] == w[1] && w[0].strength() >= Self::USEFUL)
            .count();
        (strong + strong_pairs).min(u8::MAX as usize) as u8
    }

    /// Best competing value already on the table, if any.
    fn best_on_table(view: &PlayerView) -> Option<u32> {
        let PhaseData::Turn(data) = &view.phase_data else {
            return None;
        };
        let turn = data.turn.as_ref()?;
        let lead = turn.lead_kind?;
        turn.plays
            .iter()
            .filter(|p| p.combo_kind == Some(lead))
            .map(|p| p.combo_value)
            .max()
    }

    fn weakest(options: &[Vec<Piece>]) -> Option<Vec<Piece>> {
        options
            .iter()
            .min_by_key(|set| {
                let value: u32 = set.iter().map(|p| p.strength() as u32).sum();
                (value, set.len())
            })
            .cloned()
    }

    fn combos(options: &[Vec<Piece>]) -> Vec<(Vec<Piece>, Combo)> {
        options
            .iter()
            .filter_map(|set| evaluate(set).map(|c| (set.clone(), c)))
            .collect()
    }
}

impl BotPolicy for Heuristic {
    fn choose_redeal(&self, view: &PlayerView) -> Result<bool, AiError> {
        let useful = view
            .hand
            .iter()
            .filter(|p| p.strength() >= Self::USEFUL)
            .count();
        Ok(useful < 2)
    }

    fn choose_declaration(&self, view: &PlayerView) -> Result<u8, AiError> {
        let target = Self::estimate_piles(&view.hand) as i16;
        view.legal_declarations
            .iter()
            .copied()
            .min_by_key(|&v| ((v as i16 - target).abs(), v))
            .ok_or_else(|| AiError::InvalidMove("no legal declarations available".into()))
    }

    fn choose_play(&self, view: &PlayerView) -> Result<Vec<Piece>, AiError> {
        let options = &view.legal_plays;
        let shed = || {
            Self::weakest(options)
                .ok_or_else(|| AiError::InvalidMove("no legal plays available".into()))
        };

        if view.at_target() {
            return shed();
        }

        let needed = view
            .declared
            .map(|d| d.saturating_sub(view.captured))
            .unwrap_or(u8::MAX) as usize;

        if view.is_leading() {
            let best = Self::combos(options)
                .into_iter()
                .filter(|(set, _)| set.len() <= needed)
                .max_by_key(|(set, combo)| (combo.value, set.len()));
            return match best {
                Some((set, _)) => Ok(set),
                None => shed(),
            };
        }

        let to_beat = Self::best_on_table(view).unwrap_or(0);
        let lead_kind = match &view.phase_data {
            PhaseData::Turn(data) => data.turn.as_ref().and_then(|t| t.lead_kind),
            _ => None,
        };
        let cheapest_win = Self::combos(options)
            .into_iter()
            .filter(|(_, combo)| Some(combo.kind) == lead_kind && combo.value > to_beat)
            .min_by_key(|(_, combo)| combo.value);
        match cheapest_win {
            Some((set, _)) => Ok(set),
            None => shed(),
        }
    }
}
