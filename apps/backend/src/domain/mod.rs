//! Domain layer: pure game logic types and helpers.

pub mod combos;
pub mod dealing;
pub mod declaration;
pub mod pieces_parsing;
pub mod pieces_serde;
pub mod pieces_types;
pub mod player_view;

pub mod game_transition;
pub mod phases;
pub mod redeal;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_declaration;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_snapshot_phases;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use combos::{Combo, ComboKind};
pub use dealing::{deal_hands, is_weak_hand};
pub use phases::{ActionType, PhaseState};
pub use pieces_parsing::try_parse_pieces;
pub use pieces_types::{full_set, Piece, PieceColor, PieceName};
pub use player_view::PlayerView;
pub use seed_derivation::{derive_bot_seed, derive_dealing_seed};
pub use snapshot::{PhaseData, PhaseUpdate, RoomId};
pub use state::{GamePhase, GameState, Player, Seat};
