//! Test-only game state builders for domain unit tests.

use crate::domain::pieces_parsing::try_parse_pieces;
use crate::domain::rules::{FULL_SET_SIZE, PLAYERS};
use crate::domain::state::{GameState, Player, RoundState, Seat};
use crate::domain::Piece;

pub const NAMES: [&str; PLAYERS] = ["ann", "bo", "cy", "di"];

pub fn pieces(tokens: &[&str]) -> Vec<Piece> {
    try_parse_pieces(tokens).expect("test piece tokens must parse")
}

#[derive(Debug, Clone)]
pub struct MakeGameStateArgs {
    pub round_number: u16,
    pub round_starter: Seat,
    pub redeal_multiplier: u8,
    pub scores: [i32; PLAYERS],
    pub declared: [Option<u8>; PLAYERS],
    pub captured: [u8; PLAYERS],
    pub zero_streaks: [u8; PLAYERS],
    pub bots: [bool; PLAYERS],
    pub game_seed: u64,
}

impl Default for MakeGameStateArgs {
    fn default() -> Self {
        Self {
            round_number: 1,
            round_starter: 0,
            redeal_multiplier: 1,
            scores: [0; PLAYERS],
            declared: [None; PLAYERS],
            captured: [0; PLAYERS],
            zero_streaks: [0; PLAYERS],
            bots: [false; PLAYERS],
            game_seed: 42,
        }
    }
}

/// Build a mid-round state. Pieces not in any hand count as already played.
pub fn make_game_state(hands: [Vec<Piece>; PLAYERS], args: MakeGameStateArgs) -> GameState {
    let players = hands
        .into_iter()
        .enumerate()
        .map(|(seat, hand)| {
            let mut p = Player::new(NAMES[seat], args.bots[seat]);
            p.hand = hand;
            p.declared = args.declared[seat];
            p.captured_piles = args.captured[seat];
            p.score = args.scores[seat];
            p.consecutive_zero_declarations = args.zero_streaks[seat];
            p
        })
        .collect();
    let mut state = GameState::new(players, args.game_seed).expect("four unique test players");
    let in_hands: usize = state.players.iter().map(|p| p.hand.len()).sum();
    state.round = RoundState {
        round_number: args.round_number,
        round_starter: args.round_starter,
        redeal_multiplier: args.redeal_multiplier,
        pieces_played: FULL_SET_SIZE - in_hands,
        ..RoundState::empty()
    };
    state
}

pub fn empty_hands() -> [Vec<Piece>; PLAYERS] {
    Default::default()
}
