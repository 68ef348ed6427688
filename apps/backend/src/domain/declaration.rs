//! Declaration validation: range, zero streak, and the forbidden total.

use crate::domain::rules::{valid_declaration_range, PLAYERS, TOTAL_PILES};
use crate::domain::state::{turn_order, GameState, Seat};
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind, RuleKind};

/// Outcome of an accepted declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationOutcome {
    pub value: u8,
    pub all_declared: bool,
    pub next_declarer: Option<Seat>,
}

/// Number of players that have declared this round.
pub fn declared_count(state: &GameState) -> usize {
    state.players.iter().filter(|p| p.declared.is_some()).count()
}

/// The seat whose declaration is expected next, following the round's turn
/// order from the starter.
pub fn expected_declarer(state: &GameState) -> Option<Seat> {
    turn_order(state.round.round_starter)
        .into_iter()
        .find(|&seat| state.player(seat).declared.is_none())
}

/// Validate `value` for `seat` without mutating anything.
///
/// Only the last declarer is bound by the forbidden total; earlier players
/// cannot complete the sum.
pub fn validate_declaration(
    state: &GameState,
    seat: Seat,
    value: i16,
    max_zero_streak: u8,
) -> Result<u8, DomainError> {
    let player = state.player(seat);
    if player.declared.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::DuplicateDeclaration,
            format!("{} already declared", player.name),
        ));
    }

    let expected = expected_declarer(state);
    if expected != Some(seat) {
        return Err(DomainError::invalid(
            InvalidActionKind::OutOfTurn,
            format!("{} is not the current declarer", player.name),
        ));
    }

    let range = valid_declaration_range();
    let value = u8::try_from(value)
        .ok()
        .filter(|v| range.contains(v))
        .ok_or_else(|| {
            DomainError::rule(
                RuleKind::DeclarationOutOfRange,
                format!(
                    "declaration {value} outside {}..={}",
                    range.start(),
                    range.end()
                ),
            )
        })?;

    if value == 0 && player.consecutive_zero_declarations >= max_zero_streak {
        return Err(DomainError::rule(
            RuleKind::ZeroStreak,
            format!(
                "{} declared zero in {} consecutive rounds and must declare at least 1",
                player.name, player.consecutive_zero_declarations
            ),
        ));
    }

    if declared_count(state) == PLAYERS - 1 {
        let others: u8 = state.players.iter().filter_map(|p| p.declared).sum();
        if others + value == TOTAL_PILES {
            return Err(DomainError::rule(
                RuleKind::ForbiddenTotal,
                format!("declarations may not total {TOTAL_PILES}; choose a value other than {value}"),
            ));
        }
    }

    Ok(value)
}

/// Values `seat` could declare right now.
pub fn legal_declarations(state: &GameState, seat: Seat, max_zero_streak: u8) -> Vec<u8> {
    valid_declaration_range()
        .filter(|&v| validate_declaration(state, seat, v as i16, max_zero_streak).is_ok())
        .collect()
}

/// Validate then record a declaration.
pub fn place_declaration(
    state: &mut GameState,
    seat: Seat,
    value: i16,
    max_zero_streak: u8,
) -> Result<DeclarationOutcome, DomainError> {
    let value = validate_declaration(state, seat, value, max_zero_streak)?;
    state.player_mut(seat).declared = Some(value);
    let next_declarer = expected_declarer(state);
    Ok(DeclarationOutcome {
        value,
        all_declared: next_declarer.is_none(),
        next_declarer,
    })
}

/// Roll each player's zero streak forward once the round's declarations are
/// final.
pub fn finalize_zero_streaks(state: &mut GameState) {
    for player in &mut state.players {
        match player.declared {
            Some(0) => {
                player.consecutive_zero_declarations =
                    player.consecutive_zero_declarations.saturating_add(1)
            }
            Some(_) => player.consecutive_zero_declarations = 0,
            None => {}
        }
    }
}
