//! Services layer: the phase state machine driving each room's game.

pub mod game_flow;
