//! RNG seed derivation utilities for deterministic game behavior.
//!
//! Provides functions to derive unique-but-deterministic seeds for different
//! game contexts (dealing, bot thinking) from a base room seed.

/// Derive a seed for one deal.
///
/// Each redeal within a round gets its own `deal_attempt`, so a redealt
/// round never reproduces the hands it replaced.
pub fn derive_dealing_seed(game_seed: u64, round_no: u16, deal_attempt: u8) -> u64 {
    game_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add((deal_attempt as u64).wrapping_mul(1_000))
        .wrapping_add(2)
}

/// Derive a seed for a bot seat's policy RNG.
pub fn derive_bot_seed(game_seed: u64, seat: u8) -> u64 {
    game_seed
        .wrapping_add((seat as u64).wrapping_mul(100))
        .wrapping_add(1)
}
