//! Phase data: the read model handed to broadcasters and bots.
//!
//! Everything in [`PhaseData`] is public. Hand contents live only in
//! [`PrivateHands`] so a broadcaster can redact per recipient without
//! inspecting the payload.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::combos::ComboKind;
use crate::domain::declaration::{declared_count, expected_declarer};
use crate::domain::phases::{ActionType, PhaseState};
use crate::domain::redeal::RedealChoice;
use crate::domain::rules::{PLAYERS, TOTAL_PILES};
use crate::domain::scoring::RoundRecord;
use crate::domain::state::{turn_order, GamePhase, GameState, Seat, TurnState};
use crate::domain::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub Uuid);

impl RoomId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Public facts about one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub seat: Seat,
    pub name: String,
    pub is_bot: bool,
    pub declared: Option<u8>,
    pub captured_piles: u8,
    pub score: i32,
    pub hand_size: usize,
    pub consecutive_zero_declarations: u8,
}

/// Shared public round facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPublic {
    pub round_number: u16,
    pub round_starter: String,
    pub redeal_multiplier: u8,
    pub turn_number: u8,
    pub turn_order: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayPublic {
    pub player: String,
    pub pieces: Vec<Piece>,
    /// `None` for a discard that cannot win.
    pub combo_kind: Option<ComboKind>,
    pub combo_value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPublic {
    pub turn_number: u8,
    pub starter: String,
    pub required_piece_count: Option<u8>,
    pub lead_kind: Option<ComboKind>,
    pub plays: Vec<PlayPublic>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationData {
    pub round: RoundPublic,
    pub players: Vec<PlayerPublic>,
    pub weak_players: Vec<String>,
    pub pending_responses: Vec<String>,
    pub responses: BTreeMap<String, RedealChoice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationData {
    pub round: RoundPublic,
    pub players: Vec<PlayerPublic>,
    pub current_declarer: Option<String>,
    pub declared_total: u8,
    /// Value the last declarer may not choose.
    pub forbidden_value: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnData {
    pub round: RoundPublic,
    pub players: Vec<PlayerPublic>,
    pub turn: Option<TurnPublic>,
    pub current_player: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResultsData {
    pub round: RoundPublic,
    pub players: Vec<PlayerPublic>,
    pub turn: Option<TurnPublic>,
    pub winner: String,
    pub piles_awarded: u8,
    pub round_complete: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringData {
    pub round: RoundPublic,
    pub players: Vec<PlayerPublic>,
    pub record: RoundRecord,
    pub game_over: bool,
    pub history: Vec<RoundRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverData {
    pub players: Vec<PlayerPublic>,
    pub winners: Vec<String>,
    pub rounds_played: u16,
    pub history: Vec<RoundRecord>,
}

/// Adjacently tagged union of phase-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseData {
    Waiting { players: Vec<PlayerPublic> },
    Preparation(PreparationData),
    Declaration(DeclarationData),
    Turn(TurnData),
    TurnResults(TurnResultsData),
    Scoring(ScoringData),
    GameOver(GameOverData),
}

impl PhaseData {
    pub fn players(&self) -> &[PlayerPublic] {
        match self {
            PhaseData::Waiting { players } => players,
            PhaseData::Preparation(d) => &d.players,
            PhaseData::Declaration(d) => &d.players,
            PhaseData::Turn(d) => &d.players,
            PhaseData::TurnResults(d) => &d.players,
            PhaseData::Scoring(d) => &d.players,
            PhaseData::GameOver(d) => &d.players,
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerPublic> {
        self.players().iter().find(|p| p.name == name)
    }
}

/// Hand contents keyed by player name. Never part of the public payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateHands(BTreeMap<String, Vec<Piece>>);

impl PrivateHands {
    pub fn hand_of(&self, name: &str) -> Option<&[Piece]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

/// One broadcast unit: phase name, public data and the private hands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseUpdate {
    pub room_id: RoomId,
    /// Strictly increasing per room.
    pub sequence: u64,
    pub version: u64,
    pub phase: GamePhase,
    pub allowed_actions: Vec<ActionType>,
    pub phase_data: PhaseData,
    #[serde(skip)]
    pub hands: PrivateHands,
}

/// What one recipient may see: the public update plus their own hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerUpdate<'a> {
    #[serde(flatten)]
    pub update: &'a PhaseUpdate,
    pub hand: Option<&'a [Piece]>,
}

impl PhaseUpdate {
    pub fn for_player<'a>(&'a self, name: &str) -> PlayerUpdate<'a> {
        PlayerUpdate {
            update: self,
            hand: self.hands.hand_of(name),
        }
    }

    /// Public payload as a JSON map for transports that want untyped data.
    pub fn public_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

pub fn players_public(state: &GameState) -> Vec<PlayerPublic> {
    state
        .players
        .iter()
        .enumerate()
        .map(|(seat, p)| PlayerPublic {
            seat: seat as Seat,
            name: p.name.clone(),
            is_bot: p.is_bot,
            declared: p.declared,
            captured_piles: p.captured_piles,
            score: p.score,
            hand_size: p.hand.len(),
            consecutive_zero_declarations: p.consecutive_zero_declarations,
        })
        .collect()
}

pub fn private_hands(state: &GameState) -> PrivateHands {
    PrivateHands(
        state
            .players
            .iter()
            .map(|p| (p.name.clone(), p.hand.clone()))
            .collect(),
    )
}

fn name_of(state: &GameState, seat: Seat) -> String {
    state.player(seat).name.clone()
}

fn round_public(state: &GameState) -> RoundPublic {
    RoundPublic {
        round_number: state.round.round_number,
        round_starter: name_of(state, state.round.round_starter),
        redeal_multiplier: state.round.redeal_multiplier,
        turn_number: state.round.turn_number,
        turn_order: turn_order(state.round.round_starter)
            .into_iter()
            .map(|s| name_of(state, s))
            .collect(),
    }
}

fn turn_public(state: &GameState, turn: &TurnState) -> TurnPublic {
    TurnPublic {
        turn_number: turn.turn_number,
        starter: name_of(state, turn.starter),
        required_piece_count: turn.required_piece_count,
        lead_kind: turn.lead_kind,
        plays: turn
            .plays
            .iter()
            .map(|play| PlayPublic {
                player: name_of(state, play.seat),
                pieces: play.pieces.clone(),
                combo_kind: play.combo.map(|c| c.kind),
                combo_value: play.combo_value(),
            })
            .collect(),
    }
}

/// Project game state plus the active phase into public phase data.
pub fn phase_data(state: &GameState, phase: &PhaseState) -> PhaseData {
    let players = players_public(state);
    match phase {
        PhaseState::Waiting => PhaseData::Waiting { players },
        PhaseState::Preparation { vote } => {
            let names = |seats: &[Seat]| -> Vec<String> {
                seats.iter().map(|&s| name_of(state, s)).collect()
            };
            let (weak_players, pending_responses, responses): (_, _, BTreeMap<_, _>) = match vote {
                Some(vote) => (
                    names(vote.eligible()),
                    names(&vote.pending()),
                    vote.responses()
                        .iter()
                        .map(|(&s, &c)| (name_of(state, s), c))
                        .collect(),
                ),
                None => (Vec::new(), Vec::new(), BTreeMap::new()),
            };
            PhaseData::Preparation(PreparationData {
                round: round_public(state),
                players,
                weak_players,
                pending_responses,
                responses,
            })
        }
        PhaseState::Declaration => {
            let declared_total: u8 = state.players.iter().filter_map(|p| p.declared).sum();
            let forbidden_value = (declared_count(state) == PLAYERS - 1)
                .then(|| TOTAL_PILES.checked_sub(declared_total))
                .flatten();
            PhaseData::Declaration(DeclarationData {
                round: round_public(state),
                players,
                current_declarer: expected_declarer(state).map(|s| name_of(state, s)),
                declared_total,
                forbidden_value,
            })
        }
        PhaseState::Turn => {
            let turn = state.turn.as_ref();
            PhaseData::Turn(TurnData {
                round: round_public(state),
                players,
                turn: turn.map(|t| turn_public(state, t)),
                current_player: turn
                    .and_then(TurnState::expected_player)
                    .map(|s| name_of(state, s)),
            })
        }
        PhaseState::TurnResults { resolution } => PhaseData::TurnResults(TurnResultsData {
            round: round_public(state),
            players,
            turn: state.turn.as_ref().map(|t| turn_public(state, t)),
            winner: name_of(state, resolution.winner),
            piles_awarded: resolution.piles_awarded,
            round_complete: resolution.round_complete,
        }),
        PhaseState::Scoring { record, winners } => PhaseData::Scoring(ScoringData {
            round: round_public(state),
            players,
            record: record.clone(),
            game_over: winners.is_some(),
            history: state.history.clone(),
        }),
        PhaseState::GameOver { winners } => PhaseData::GameOver(GameOverData {
            players,
            winners: winners.iter().map(|&s| name_of(state, s)).collect(),
            rounds_played: state.round.round_number,
            history: state.history.clone(),
        }),
    }
}
