use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::domain::scoring::{ScoringRules, WinCondition};
use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigError
    }
}

/// Tunables for one room. Every field has a default and can be overridden
/// with a `LIAP_*` environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub win: WinCondition,
    pub scoring: ScoringRules,
    /// Consecutive zero declarations after which zero is refused.
    pub max_zero_streak: u8,
    /// Accepted redeals per round before weak hands are ignored.
    pub max_redeals: u8,
    pub redeal_timeout: Duration,
    pub turn_results_delay: Duration,
    pub scoring_delay: Duration,
    pub broadcast_ack_timeout: Duration,
    pub bot_delay_min: Duration,
    pub bot_delay_max: Duration,
    /// Bounded capacity of each room's action queue.
    pub queue_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win: WinCondition::default(),
            scoring: ScoringRules::default(),
            max_zero_streak: 2,
            max_redeals: 3,
            redeal_timeout: Duration::from_secs(30),
            turn_results_delay: Duration::from_millis(1_500),
            scoring_delay: Duration::from_secs(3),
            broadcast_ack_timeout: Duration::from_secs(2),
            bot_delay_min: Duration::from_millis(500),
            bot_delay_max: Duration::from_millis(1_500),
            queue_capacity: 64,
        }
    }
}

impl GameConfig {
    /// Defaults with every delay removed.
    pub fn for_tests() -> Self {
        Self {
            turn_results_delay: Duration::ZERO,
            scoring_delay: Duration::ZERO,
            bot_delay_min: Duration::ZERO,
            bot_delay_max: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let reader = Reader { lookup: &lookup };

        if let Some(v) = reader.parse("LIAP_WIN_SCORE")? {
            cfg.win.win_score = v;
        }
        if let Some(v) = reader.parse("LIAP_MAX_ROUNDS")? {
            cfg.win.max_rounds = v;
        }
        if let Some(v) = reader.parse("LIAP_MAX_ZERO_STREAK")? {
            cfg.max_zero_streak = v;
        }
        if let Some(v) = reader.parse("LIAP_MAX_REDEALS")? {
            cfg.max_redeals = v;
        }
        if let Some(v) = reader.millis("LIAP_REDEAL_TIMEOUT_MS")? {
            cfg.redeal_timeout = v;
        }
        if let Some(v) = reader.millis("LIAP_TURN_RESULTS_MS")? {
            cfg.turn_results_delay = v;
        }
        if let Some(v) = reader.millis("LIAP_SCORING_MS")? {
            cfg.scoring_delay = v;
        }
        if let Some(v) = reader.millis("LIAP_BROADCAST_ACK_MS")? {
            cfg.broadcast_ack_timeout = v;
        }
        if let Some(v) = reader.millis("LIAP_BOT_DELAY_MIN_MS")? {
            cfg.bot_delay_min = v;
        }
        if let Some(v) = reader.millis("LIAP_BOT_DELAY_MAX_MS")? {
            cfg.bot_delay_max = v;
        }
        if let Some(v) = reader.parse("LIAP_QUEUE_CAPACITY")? {
            cfg.queue_capacity = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win.max_rounds == 0 {
            return Err(invalid("LIAP_MAX_ROUNDS", "must be at least 1"));
        }
        if self.win.win_score <= 0 {
            return Err(invalid("LIAP_WIN_SCORE", "must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(invalid("LIAP_QUEUE_CAPACITY", "must be at least 1"));
        }
        if self.bot_delay_min > self.bot_delay_max {
            return Err(invalid(
                "LIAP_BOT_DELAY_MIN_MS",
                "must not exceed LIAP_BOT_DELAY_MAX_MS",
            ));
        }
        Ok(())
    }
}

fn invalid(var: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.into(),
    }
}

struct Reader<'a, F> {
    lookup: &'a F,
}

impl<F> Reader<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn parse<T>(&self, var: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.lookup)(var) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| invalid(var, format!("{raw:?}: {e}"))),
        }
    }

    fn millis(&self, var: &'static str) -> Result<Option<Duration>, ConfigError> {
        Ok(self.parse::<u64>(var)?.map(Duration::from_millis))
    }
}
