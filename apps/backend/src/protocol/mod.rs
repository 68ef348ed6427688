//! Messages that cross the core boundary: inbound actions and their results.

pub mod actions;

pub use actions::{ActionError, ActionPayload, ActionResult, GameAction};
