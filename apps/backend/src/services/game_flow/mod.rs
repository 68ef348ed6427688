//! Phase state machine - validates actions, applies them through the pure
//! domain helpers and drives phase transitions.
//!
//! A `GameFlow` is exclusively owned by its room's processing loop. Every
//! mutation goes through `handle_action`, `fire_timer` or `start`, each of
//! which is checkpointed: a failure restores the state exactly as it was.

mod mutation;
mod orchestration;
mod player_actions;
mod round_lifecycle;


use std::time::Duration;

use tracing::info;

pub use mutation::FlowOutput;

use crate::config::GameConfig;
use crate::domain::phases::PhaseState;
use crate::domain::player_view::{expected_action, PlayerView};
use crate::domain::rules::PLAYERS;
use crate::domain::snapshot::{phase_data, private_hands, PhaseUpdate, RoomId};
use crate::domain::state::{GamePhase, GameState, Player, Seat};
use crate::domain::Piece;
use crate::errors::domain::{DomainError, InvalidActionKind, RoomErrorKind};

/// Deferred work the room loop must schedule on the flow's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Open redeal vote expires; silent seats decline.
    RedealTimeout,
    /// TURN_RESULTS has been shown long enough.
    TurnResultsDisplay,
    /// SCORING has been shown long enough.
    ScoringDisplay,
}

/// A timer armed for one phase instance. Firing it after the phase has
/// moved on is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimer {
    pub kind: TimerKind,
    pub delay: Duration,
    /// Phase entry counter at arm time.
    pub epoch: u64,
}

/// Pre-seeded starting point for tests and tools that skip the early phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededStart {
    /// One of WAITING, PREPARATION, DECLARATION or TURN.
    pub phase: GamePhase,
    /// Dealt from the game seed when absent.
    pub hands: Option<[Vec<Piece>; PLAYERS]>,
    pub declarations: [Option<u8>; PLAYERS],
    pub captured: [u8; PLAYERS],
    pub scores: [i32; PLAYERS],
    pub zero_streaks: [u8; PLAYERS],
    pub round_number: u16,
    /// Defaults to the GENERAL_RED holder.
    pub round_starter: Option<Seat>,
    pub redeal_multiplier: u8,
}

impl SeededStart {
    pub fn new(phase: GamePhase) -> Self {
        Self {
            phase,
            hands: None,
            declarations: [None; PLAYERS],
            captured: [0; PLAYERS],
            scores: [0; PLAYERS],
            zero_streaks: [0; PLAYERS],
            round_number: 1,
            round_starter: None,
            redeal_multiplier: 1,
        }
    }

    pub fn with_hands(mut self, hands: [Vec<Piece>; PLAYERS]) -> Self {
        self.hands = Some(hands);
        self
    }

    pub fn with_declarations(mut self, declarations: [Option<u8>; PLAYERS]) -> Self {
        self.declarations = declarations;
        self
    }

    pub fn with_starter(mut self, seat: Seat) -> Self {
        self.round_starter = Some(seat);
        self
    }
}

pub struct GameFlow {
    room_id: RoomId,
    config: GameConfig,
    state: GameState,
    phase: PhaseState,
    /// Bumped once per committed mutation.
    version: u64,
    /// Bumped once per emitted update.
    sequence: u64,
    /// Bumped on every phase entry; scopes timers.
    epoch: u64,
    failed: Option<String>,
}

impl GameFlow {
    /// A game waiting for START_GAME.
    pub fn new(
        room_id: RoomId,
        players: Vec<Player>,
        game_seed: u64,
        config: GameConfig,
    ) -> Result<Self, DomainError> {
        let state = GameState::new(players, game_seed)?;
        Ok(Self {
            room_id,
            config,
            state,
            phase: PhaseState::Waiting,
            version: 0,
            sequence: 0,
            epoch: 0,
            failed: None,
        })
    }

    /// A game placed directly into `seed.phase` with pre-seeded data.
    pub fn seeded(
        room_id: RoomId,
        players: Vec<Player>,
        game_seed: u64,
        config: GameConfig,
        seed: SeededStart,
    ) -> Result<Self, DomainError> {
        let mut flow = Self::new(room_id, players, game_seed, config)?;
        flow.apply_seed(seed)?;
        info!(
            room_id = %flow.room_id,
            phase = %flow.phase.phase(),
            "Game flow seeded"
        );
        Ok(flow)
    }

    /// Activate the current phase: broadcast its entry payload and apply any
    /// transition that is already due.
    pub fn start(&mut self) -> Result<FlowOutput, DomainError> {
        self.run_mutation(|flow, out| {
            flow.emit(out);
            flow.advance(out)
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase_state(&self) -> &PhaseState {
        &self.phase
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failed.as_deref()
    }

    pub fn is_over(&self) -> bool {
        self.phase() == GamePhase::GameOver
    }

    /// Current phase as a broadcast unit, at the latest sequence number.
    pub fn snapshot(&self) -> PhaseUpdate {
        PhaseUpdate {
            room_id: self.room_id,
            sequence: self.sequence,
            version: self.version,
            phase: self.phase(),
            allowed_actions: self.phase.allowed_actions().to_vec(),
            phase_data: phase_data(&self.state, &self.phase),
            hands: private_hands(&self.state),
        }
    }

    pub fn view_for(&self, seat: Seat) -> PlayerView {
        PlayerView::build(&self.state, &self.phase, seat, self.config.max_zero_streak)
    }

    pub fn view_for_name(&self, name: &str) -> Result<PlayerView, DomainError> {
        let seat = self.state.seat_of(name)?;
        Ok(self.view_for(seat))
    }

    /// Bot seats that owe the game an action right now.
    pub fn bots_to_act(&self) -> Vec<Seat> {
        (0..PLAYERS as Seat)
            .filter(|&seat| self.state.player(seat).is_bot)
            .filter(|&seat| expected_action(&self.state, &self.phase, seat).is_some())
            .collect()
    }

    fn emit(&mut self, out: &mut FlowOutput) {
        self.sequence += 1;
        out.updates.push(self.snapshot());
    }

    fn ensure_not_failed(&self) -> Result<(), DomainError> {
        match &self.failed {
            Some(reason) => Err(DomainError::room(
                RoomErrorKind::Failed,
                format!("room {} halted: {reason}", self.room_id),
            )),
            None => Ok(()),
        }
    }

    fn unsupported_seed(phase: GamePhase) -> DomainError {
        DomainError::invalid(
            InvalidActionKind::MalformedPayload,
            format!("cannot seed a game directly into {phase}"),
        )
    }
}
