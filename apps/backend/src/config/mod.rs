//! Runtime configuration.

pub mod game;

pub use game::{ConfigError, GameConfig};
