#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod errors;
pub mod protocol;
pub mod rooms;
pub mod services;
pub mod telemetry;


// Re-exports for public API
pub use config::{ConfigError, GameConfig};
pub use domain::{GamePhase, PhaseUpdate, Piece, PlayerView, RoomId};
pub use errors::{DomainError, ErrorCode, ErrorKind};
pub use protocol::{ActionPayload, ActionResult, GameAction};
pub use rooms::{RoomHandle, RoomRegistry, RoomSpec, RoomStatus, SeatSpec};
pub use services::game_flow::{FlowOutput, GameFlow, SeededStart};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
