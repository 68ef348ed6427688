//! How to register a bot policy
//!
//! 1) Implement `BotPolicy` for your type in its module.
//! 2) Add a `PolicyFactory` entry to the static list with a stable `name` and `version`.
//! 3) Determinism: same seed ⇒ same behavior (where applicable).

use std::sync::Arc;

use crate::ai::{BotPolicy, Heuristic, RandomPlayer};

/// Factory definition for constructing bot policies.
pub struct PolicyFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Arc<dyn BotPolicy>,
}

static POLICY_FACTORIES: &[PolicyFactory] = &[
    PolicyFactory {
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        make: make_random_player,
    },
    PolicyFactory {
        name: Heuristic::NAME,
        version: Heuristic::VERSION,
        make: make_heuristic,
    },
];

/// Returns the statically registered policy factories.
pub fn registered_policies() -> &'static [PolicyFactory] {
    POLICY_FACTORIES
}

/// Finds a registered policy factory by its name.
pub fn by_name(name: &str) -> Option<&'static PolicyFactory> {
    registered_policies().iter().find(|factory| factory.name == name)
}

fn make_random_player(seed: Option<u64>) -> Arc<dyn BotPolicy> {
    Arc::new(RandomPlayer::new(seed))
}

/// The heuristic is deterministic; the seat seed does not apply.
fn make_heuristic(_seed: Option<u64>) -> Arc<dyn BotPolicy> {
    Arc::new(Heuristic::new())
}
