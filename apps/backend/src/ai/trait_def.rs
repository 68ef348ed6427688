//! Bot policy trait definition.

use thiserror::Error;

use crate::domain::{Piece, PlayerView};

/// Errors that can occur during bot decision-making.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiError {
    /// Bot produced, or could only produce, an invalid move
    #[error("bot invalid move: {0}")]
    InvalidMove(String),
    /// Asked to decide when the view expects no action
    #[error("bot has nothing to decide in phase {0}")]
    NothingToDecide(String),
}

/// Trait for bot players.
///
/// Implementations receive the state visible to one player and choose a
/// move. The view carries precomputed legal options; the room still
/// validates whatever comes back through the normal action path.
pub trait BotPolicy: Send + Sync {
    /// Accept (`true`) or decline a weak-hand redeal.
    fn choose_redeal(&self, view: &PlayerView) -> Result<bool, AiError>;

    /// Choose a declaration value.
    ///
    /// Query `view.legal_declarations` for valid options.
    fn choose_declaration(&self, view: &PlayerView) -> Result<u8, AiError>;

    /// Choose the pieces to play.
    ///
    /// Query `view.legal_plays` for valid options.
    fn choose_play(&self, view: &PlayerView) -> Result<Vec<Piece>, AiError>;
}
