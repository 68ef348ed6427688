//! Random bot - makes random legal moves.
//!
//! [`RandomPlayer`] is the baseline policy and the fallback used when
//! another policy keeps producing rejected moves.

use parking_lot::Mutex;
use rand::prelude::*;

use super::trait_def::{AiError, BotPolicy};
use crate::domain::{Piece, PlayerView};

/// Bot that chooses uniformly among legal moves.
///
/// Deterministic when seeded.
pub struct RandomPlayer {
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl BotPolicy for RandomPlayer {
    fn choose_redeal(&self, _view: &PlayerView) -> Result<bool, AiError> {
        Ok(self.rng.lock().random_bool(0.5))
    }

    fn choose_declaration(&self, view: &PlayerView) -> Result<u8, AiError> {
        let mut rng = self.rng.lock();
        view.legal_declarations
            .choose(&mut *rng)
            .copied()
            .ok_or_else(|| AiError::InvalidMove("no legal declarations available".into()))
    }

    fn choose_play(&self, view: &PlayerView) -> Result<Vec<Piece>, AiError> {
        let mut rng = self.rng.lock();
        view.legal_plays
            .choose(&mut *rng)
            .cloned()
            .ok_or_else(|| AiError::InvalidMove("no legal plays available".into()))
    }
}
