use std::ops::RangeInclusive;

pub const PLAYERS: usize = 4;
pub const PIECES_PER_HAND: usize = 8;
pub const FULL_SET_SIZE: usize = PLAYERS * PIECES_PER_HAND;

/// Piles in play per round; one pile per piece a player holds at the deal.
pub const TOTAL_PILES: u8 = PIECES_PER_HAND as u8;

/// Largest play allowed in one turn.
pub const MAX_PLAY_SIZE: usize = 6;

/// A hand is weak when none of its pieces is stronger than this
/// (ELEPHANT_BLACK).
pub const WEAK_HAND_MAX_STRENGTH: u8 = 9;

pub fn valid_declaration_range() -> RangeInclusive<u8> {
    0..=TOTAL_PILES
}

pub fn valid_play_sizes() -> RangeInclusive<usize> {
    1..=MAX_PLAY_SIZE
}
