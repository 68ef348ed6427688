//! Deterministic dealing.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::pieces_types::{full_set, Piece};
use crate::domain::rules::{PIECES_PER_HAND, PLAYERS, WEAK_HAND_MAX_STRENGTH};

/// Shuffle the full set with `seed` and deal one hand per seat.
///
/// Hands are sorted weakest first for stable display. The whole set is
/// dealt; nothing is left over.
pub fn deal_hands(seed: u64) -> [Vec<Piece>; PLAYERS] {
    let mut set = full_set();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    set.shuffle(&mut rng);

    let mut hands: [Vec<Piece>; PLAYERS] = Default::default();
    for (seat, chunk) in set.chunks(PIECES_PER_HAND).enumerate() {
        let mut hand = chunk.to_vec();
        hand.sort();
        hands[seat] = hand;
    }
    hands
}

/// True when no piece in `hand` is stronger than the weak-hand ceiling.
pub fn is_weak_hand(hand: &[Piece]) -> bool {
    hand.iter().all(|p| p.strength() <= WEAK_HAND_MAX_STRENGTH)
}
