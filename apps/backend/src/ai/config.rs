//! Bot seat configuration.
//!
//! Seats accept a small JSON document. Unknown fields are ignored.
//!
//! ```json
//! {"policy": "Heuristic", "seed": 12345}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ai::Heuristic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Registered policy name; defaults to the heuristic bot.
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Optional RNG seed for deterministic bot behavior.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_policy() -> String {
    Heuristic::NAME.to_owned()
}

impl BotConfig {
    /// Parse an optional JSON config, falling back to defaults when the
    /// document does not match the schema.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        config
            .and_then(|json| serde_json::from_value(json.clone()).ok())
            .unwrap_or_default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            seed: None,
        }
    }
}
