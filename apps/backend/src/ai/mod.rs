//! Bot players - automated game decisions.
//!
//! This module provides:
//! - the `BotPolicy` trait bots implement
//! - `RandomPlayer` (seedable) and `Heuristic` reference policies
//! - a registry of policies by name
//! - `get_bot_decision`, which turns a policy's choice into a normal `GameAction`

pub mod config;
mod heuristic;
mod random;
pub mod registry;
mod trait_def;

#[cfg(test)]
mod tests_policies;

use std::sync::Arc;

pub use config::BotConfig;
pub use heuristic::Heuristic;
pub use random::RandomPlayer;
pub use trait_def::{AiError, BotPolicy};

use crate::domain::phases::ActionType;
use crate::domain::PlayerView;
use crate::protocol::GameAction;

/// Attempts a policy gets before the room falls back to random legal play.
pub const MAX_BOT_ATTEMPTS: usize = 3;

/// Build the bot's action for whatever `view` expects of it.
///
/// The result is an ordinary `GameAction`; it goes through the same
/// validation as a human submission.
pub fn get_bot_decision(policy: &dyn BotPolicy, view: &PlayerView) -> Result<GameAction, AiError> {
    let name = view.player_name.clone();
    match view.expected_action {
        Some(ActionType::RedealResponse) => {
            Ok(GameAction::redeal_response(name, policy.choose_redeal(view)?))
        }
        Some(ActionType::Declare) => {
            let value = policy.choose_declaration(view)?;
            Ok(GameAction::declare(name, value as i16))
        }
        Some(ActionType::PlayPieces) => Ok(GameAction::play(name, policy.choose_play(view)?)),
        Some(ActionType::StartGame) | None => Err(AiError::NothingToDecide(view.phase.to_string())),
    }
}

/// Create a policy from its registered name and config.
pub fn create_policy(config: &BotConfig) -> Option<Arc<dyn BotPolicy>> {
    registry::by_name(&config.policy).map(|factory| (factory.make)(config.seed))
}
