use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::combos::{Combo, ComboKind};
use crate::domain::rules::{FULL_SET_SIZE, PLAYERS};
use crate::domain::scoring::RoundRecord;
use crate::domain::Piece;
use crate::errors::domain::{DomainError, InvalidActionKind};

pub type Seat = u8; // 0..=3

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Room seated, game not yet started.
    Waiting,
    /// Dealing plus the weak-hand redeal vote.
    Preparation,
    /// Players declare target piles in turn order.
    Declaration,
    /// A turn (trick) is being played.
    Turn,
    /// A completed turn is on display.
    TurnResults,
    /// Round deltas applied; game-over check.
    Scoring,
    /// Terminal.
    GameOver,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Waiting => "WAITING",
            GamePhase::Preparation => "PREPARATION",
            GamePhase::Declaration => "DECLARATION",
            GamePhase::Turn => "TURN",
            GamePhase::TurnResults => "TURN_RESULTS",
            GamePhase::Scoring => "SCORING",
            GamePhase::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seated player. Score and zero streak persist across rounds; the rest
/// is reset at each deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub hand: Vec<Piece>,
    pub declared: Option<u8>,
    pub captured_piles: u8,
    pub score: i32,
    pub is_bot: bool,
    pub consecutive_zero_declarations: u8,
}

impl Player {
    pub fn new(name: impl Into<String>, is_bot: bool) -> Self {
        Self {
            name: name.into(),
            hand: Vec::new(),
            declared: None,
            captured_piles: 0,
            score: 0,
            is_bot,
            consecutive_zero_declarations: 0,
        }
    }

    pub fn reset_for_round(&mut self) {
        self.hand.clear();
        self.declared = None;
        self.captured_piles = 0;
    }
}

/// Per-round bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    /// 1-based; 0 before the first deal.
    pub round_number: u16,
    /// Seat that declares first and leads the first turn.
    pub round_starter: Seat,
    /// Starts at 1, +1 per accepted redeal.
    pub redeal_multiplier: u8,
    /// Accepted redeals so far this round.
    pub redeal_count: u8,
    /// Deal index within the round (0 for the first deal).
    pub deal_attempt: u8,
    /// Turns started so far this round.
    pub turn_number: u8,
    /// Pieces already played into turns this round.
    pub pieces_played: usize,
    /// Winner of the most recently resolved turn.
    pub last_turn_winner: Option<Seat>,
}

impl RoundState {
    pub fn empty() -> Self {
        Self {
            round_number: 0,
            round_starter: 0,
            redeal_multiplier: 1,
            redeal_count: 0,
            deal_attempt: 0,
            turn_number: 0,
            pieces_played: 0,
            last_turn_winner: None,
        }
    }
}

/// One player's contribution to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlay {
    pub seat: Seat,
    pub pieces: Vec<Piece>,
    /// Set when the play forms a combo of the turn's kind and can win.
    pub combo: Option<Combo>,
}

impl TurnPlay {
    /// Comparative value; discards never compete so they report 0.
    pub fn combo_value(&self) -> u32 {
        self.combo.map(|c| c.value).unwrap_or(0)
    }
}

/// One exchange of plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    pub turn_number: u8,
    pub starter: Seat,
    /// Fixed by the first play.
    pub required_piece_count: Option<u8>,
    /// Shape of the leading play.
    pub lead_kind: Option<ComboKind>,
    pub plays: Vec<TurnPlay>,
    pub winner: Option<Seat>,
}

impl TurnState {
    pub fn new(turn_number: u8, starter: Seat) -> Self {
        Self {
            turn_number,
            starter,
            required_piece_count: None,
            lead_kind: None,
            plays: Vec::with_capacity(PLAYERS),
            winner: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == PLAYERS
    }

    /// Seat expected to play next, if the turn is still open.
    pub fn expected_player(&self) -> Option<Seat> {
        (!self.is_complete()).then(|| expected_actor(self.starter, self.plays.len() as u8))
    }
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Seat order; index is the seat number.
    pub players: Vec<Player>,
    pub round: RoundState,
    /// Current or just-resolved turn.
    pub turn: Option<TurnState>,
    /// Completed rounds, oldest first.
    pub history: Vec<RoundRecord>,
    pub game_seed: u64,
}

impl GameState {
    pub fn new(players: Vec<Player>, game_seed: u64) -> Result<Self, DomainError> {
        if players.len() != PLAYERS {
            return Err(DomainError::invariant(format!(
                "a game needs exactly {PLAYERS} players, got {}",
                players.len()
            )));
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.name == p.name) {
                return Err(DomainError::invalid(
                    InvalidActionKind::MalformedPayload,
                    format!("duplicate player name {}", p.name),
                ));
            }
        }
        Ok(Self {
            players,
            round: RoundState::empty(),
            turn: None,
            history: Vec::new(),
            game_seed,
        })
    }

    pub fn seat_of(&self, name: &str) -> Result<Seat, DomainError> {
        self.players
            .iter()
            .position(|p| p.name == name)
            .map(|i| i as Seat)
            .ok_or_else(|| {
                DomainError::invalid(
                    InvalidActionKind::UnknownPlayer,
                    format!("{name} is not seated in this room"),
                )
            })
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat as usize]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat as usize]
    }

    pub fn all_hands_empty(&self) -> bool {
        self.players.iter().all(|p| p.hand.is_empty())
    }

    pub fn total_captured(&self) -> u8 {
        self.players.iter().map(|p| p.captured_piles).sum()
    }

    /// Hands plus pieces played must always equal the full set.
    pub fn check_piece_conservation(&self) -> Result<(), DomainError> {
        let in_hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        if in_hands + self.round.pieces_played != FULL_SET_SIZE {
            return Err(DomainError::invariant(format!(
                "piece count mismatch: {in_hands} in hands + {} played != {FULL_SET_SIZE}",
                self.round.pieces_played
            )));
        }
        Ok(())
    }
}

/// Seat / turn math helpers (4 fixed seats: 0..=3).
///
/// Clockwise direction is positive (+1).
#[inline]
pub fn seat_offset(seat: Seat, delta: i8) -> Seat {
    let seat_i = seat as i16;
    let delta_i = delta as i16;
    ((seat_i + delta_i).rem_euclid(PLAYERS as i16)) as Seat
}

#[inline]
pub fn next_seat(seat: Seat) -> Seat {
    seat_offset(seat, 1)
}

/// Returns the seat `n` steps clockwise from `start`.
#[inline]
pub fn nth_from(start: Seat, n: u8) -> Seat {
    seat_offset(start, n as i8)
}

/// Expected actor given who started and how many have already acted.
#[inline]
pub fn expected_actor(first: Seat, acted: u8) -> Seat {
    nth_from(first, acted)
}

/// Rotation of all seats beginning at `starter`.
pub fn turn_order(starter: Seat) -> [Seat; PLAYERS] {
    let mut order = [0; PLAYERS];
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = nth_from(starter, i as u8);
    }
    order
}

pub fn require_turn<'a>(state: &'a GameState, ctx: &'static str) -> Result<&'a TurnState, DomainError> {
    state.turn.as_ref().ok_or_else(|| {
        DomainError::invariant(format!("turn must be set ({ctx})"))
    })
}

pub fn require_turn_mut<'a>(
    state: &'a mut GameState,
    ctx: &'static str,
) -> Result<&'a mut TurnState, DomainError> {
    state.turn.as_mut().ok_or_else(|| {
        DomainError::invariant(format!("turn must be set ({ctx})"))
    })
}
