use crate::domain::combos::{classify, combo_beats, enumerate_combos, evaluate, remove_pieces, Combo};
use crate::domain::rules::valid_play_sizes;
use crate::domain::state::{require_turn, require_turn_mut, GameState, Seat, TurnPlay, TurnState};
use crate::domain::Piece;
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind, RuleKind};

/// Result of playing pieces, describing what state changes occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Combo the play formed, when it can compete for the turn.
    pub combo: Option<Combo>,
    /// Whether every seat has now played into the turn.
    pub turn_complete: bool,
    /// Seat expected to play next, while the turn is open.
    pub next_player: Option<Seat>,
}

/// Result of resolving a completed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnResolution {
    pub turn_number: u8,
    pub winner: Seat,
    pub piles_awarded: u8,
    /// True when every hand is empty and the round can be scored.
    pub round_complete: bool,
}

/// Open the next turn with `starter` leading.
pub fn start_turn(state: &mut GameState, starter: Seat) -> &TurnState {
    state.round.turn_number = state.round.turn_number.saturating_add(1);
    state.turn.insert(TurnState::new(state.round.turn_number, starter))
}

/// Piece sets `seat` could submit right now, independent of turn enforcement.
///
/// The leader may play any combo. Followers may play any set of the
/// required size; sets forming the lead's kind are listed first.
pub fn legal_plays(state: &GameState, seat: Seat) -> Vec<Vec<Piece>> {
    let hand = &state.player(seat).hand;
    let Some(turn) = state.turn.as_ref() else {
        return Vec::new();
    };
    if hand.is_empty() || turn.is_complete() {
        return Vec::new();
    }

    let combos = enumerate_combos(hand);
    let (Some(count), Some(kind)) = (turn.required_piece_count, turn.lead_kind) else {
        return combos.into_iter().map(|(pieces, _)| pieces).collect();
    };

    let mut out: Vec<Vec<Piece>> = combos
        .into_iter()
        .filter(|(_, combo)| combo.kind == kind)
        .map(|(pieces, _)| pieces)
        .collect();
    if let Some(discard) = weakest_set(hand, count as usize) {
        if !out.contains(&discard) {
            out.push(discard);
        }
    }
    out
}

/// The `count` lowest-strength pieces of `hand`, sorted ascending.
pub fn weakest_set(hand: &[Piece], count: usize) -> Option<Vec<Piece>> {
    if count == 0 || hand.len() < count {
        return None;
    }
    let mut sorted = hand.to_vec();
    sorted.sort();
    sorted.truncate(count);
    Some(sorted)
}

/// Play pieces into the current turn, enforcing turn order, count, ownership
/// and the lead's combo shape. Nothing is mutated unless every check passes.
pub fn play_pieces(
    state: &mut GameState,
    seat: Seat,
    pieces: &[Piece],
) -> Result<PlayOutcome, DomainError> {
    let turn = require_turn(state, "play_pieces")?;
    let name = &state.player(seat).name;

    if turn.plays.iter().any(|p| p.seat == seat) {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyPlayed,
            format!("{name} already played in turn {}", turn.turn_number),
        ));
    }
    if turn.expected_player() != Some(seat) {
        return Err(DomainError::invalid(
            InvalidActionKind::OutOfTurn,
            format!("{name} is not the current player"),
        ));
    }

    match turn.required_piece_count {
        Some(required) if pieces.len() != required as usize => {
            return Err(DomainError::rule(
                RuleKind::WrongPieceCount,
                format!("turn requires {required} pieces, got {}", pieces.len()),
            ));
        }
        None if !valid_play_sizes().contains(&pieces.len()) => {
            return Err(DomainError::rule(
                RuleKind::WrongPieceCount,
                format!("a lead must play 1 to 6 pieces, got {}", pieces.len()),
            ));
        }
        _ => {}
    }

    let remaining = remove_pieces(&state.player(seat).hand, pieces).ok_or_else(|| {
        DomainError::rule(
            RuleKind::PieceNotInHand,
            format!("{name} does not hold every piece played"),
        )
    })?;

    let combo = match turn.lead_kind {
        None => Some(evaluate(pieces).ok_or_else(|| {
            DomainError::rule(
                RuleKind::InvalidCombo,
                "the leading play must form a valid combo",
            )
        })?),
        Some(kind) if classify(pieces) == Some(kind) => evaluate(pieces),
        Some(_) => None,
    };

    // All checks passed; mutate.
    let mut sorted = pieces.to_vec();
    sorted.sort();
    state.player_mut(seat).hand = remaining;
    state.round.pieces_played += pieces.len();

    let turn = require_turn_mut(state, "play_pieces")?;
    if turn.plays.is_empty() {
        turn.required_piece_count = Some(pieces.len() as u8);
        turn.lead_kind = combo.map(|c| c.kind);
    }
    turn.plays.push(TurnPlay {
        seat,
        pieces: sorted,
        combo,
    });

    Ok(PlayOutcome {
        combo,
        turn_complete: turn.is_complete(),
        next_player: turn.expected_player(),
    })
}

/// Winner of a complete turn: the best competing combo, earliest play on
/// equal value.
pub fn turn_winner(turn: &TurnState) -> Option<Seat> {
    if !turn.is_complete() {
        return None;
    }
    let mut best: Option<(Seat, Combo)> = None;
    for play in &turn.plays {
        let Some(combo) = play.combo else { continue };
        match best {
            Some((_, incumbent)) if !combo_beats(combo, incumbent) => {}
            _ => best = Some((play.seat, combo)),
        }
    }
    best.map(|(seat, _)| seat)
}

/// Award piles for the completed turn and remember its winner.
pub fn resolve_turn(state: &mut GameState) -> Result<TurnResolution, DomainError> {
    let turn = require_turn(state, "resolve_turn")?;
    if turn.winner.is_some() {
        return Err(DomainError::invariant(format!(
            "turn {} resolved twice",
            turn.turn_number
        )));
    }
    let winner = turn_winner(turn).ok_or_else(|| {
        DomainError::invariant(format!(
            "turn {} has no winner after {} plays",
            turn.turn_number,
            turn.plays.len()
        ))
    })?;
    let piles = turn.required_piece_count.ok_or_else(|| {
        DomainError::invariant("completed turn lost its required piece count")
    })?;
    let turn_number = turn.turn_number;

    let player = state.player_mut(winner);
    player.captured_piles = player.captured_piles.saturating_add(piles);
    state.round.last_turn_winner = Some(winner);
    require_turn_mut(state, "resolve_turn")?.winner = Some(winner);
    state.check_piece_conservation()?;

    Ok(TurnResolution {
        turn_number,
        winner,
        piles_awarded: piles,
        round_complete: state.all_hands_empty(),
    })
}
