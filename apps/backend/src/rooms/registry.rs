//! Concurrency-safe map from room id to its running loop.
//!
//! The registry is an ordinary value injected into whatever transport sits
//! on top; nothing in the crate reaches for a global room table.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::bots::BotSeat;
use super::broadcast::Broadcaster;
use super::events::EventPublisher;
use super::handle::{RoomHandle, RoomStatus};
use super::task::RoomTask;
use crate::ai::{create_policy, BotConfig, RandomPlayer};
use crate::config::GameConfig;
use crate::domain::rules::PLAYERS;
use crate::domain::seed_derivation::derive_bot_seed;
use crate::domain::snapshot::{PhaseUpdate, RoomId};
use crate::domain::state::{Player, Seat};
use crate::errors::domain::{DomainError, InvalidActionKind, RoomErrorKind};
use crate::protocol::{ActionResult, GameAction};
use crate::services::game_flow::{GameFlow, SeededStart};

/// One seat at creation time. `bot` is set for bot seats.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatSpec {
    pub name: String,
    pub bot: Option<BotConfig>,
}

impl SeatSpec {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bot: None,
        }
    }

    pub fn bot(name: impl Into<String>) -> Self {
        Self::bot_with(name, BotConfig::default())
    }

    pub fn bot_with(name: impl Into<String>, config: BotConfig) -> Self {
        Self {
            name: name.into(),
            bot: Some(config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoomSpec {
    pub room_id: RoomId,
    pub seats: Vec<SeatSpec>,
    pub game_seed: u64,
    /// Overrides the registry-wide configuration.
    pub config: Option<GameConfig>,
    /// Start directly in a later phase.
    pub seeded: Option<SeededStart>,
}

impl RoomSpec {
    pub fn new(seats: Vec<SeatSpec>, game_seed: u64) -> Self {
        Self {
            room_id: RoomId::new(),
            seats,
            game_seed,
            config: None,
            seeded: None,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn seeded(mut self, seed: SeededStart) -> Self {
        self.seeded = Some(seed);
        self
    }
}

struct RoomEntry {
    handle: RoomHandle,
    task: JoinHandle<()>,
}

pub struct RoomRegistry {
    rooms: DashMap<RoomId, RoomEntry>,
    config: GameConfig,
    broadcaster: Arc<dyn Broadcaster>,
    publisher: Arc<dyn EventPublisher>,
}

impl RoomRegistry {
    pub fn new(
        config: GameConfig,
        broadcaster: Arc<dyn Broadcaster>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            rooms: DashMap::new(),
            config,
            broadcaster,
            publisher,
        }
    }

    /// Build the room's game and spawn its processing loop.
    pub fn create_room(&self, spec: RoomSpec) -> Result<RoomHandle, DomainError> {
        let room_id = spec.room_id;
        if self.rooms.contains_key(&room_id) {
            return Err(DomainError::room(
                RoomErrorKind::AlreadyExists,
                format!("room {room_id} already exists"),
            ));
        }
        if spec.seats.len() != PLAYERS {
            return Err(DomainError::invalid(
                InvalidActionKind::MalformedPayload,
                format!("a room needs {PLAYERS} seats, got {}", spec.seats.len()),
            ));
        }

        let config = spec.config.unwrap_or_else(|| self.config.clone());
        let bots = build_bots(&spec.seats, spec.game_seed)?;
        let players = spec
            .seats
            .iter()
            .map(|s| Player::new(s.name.clone(), s.bot.is_some()))
            .collect();
        let flow = match spec.seeded {
            Some(seed) => GameFlow::seeded(room_id, players, spec.game_seed, config.clone(), seed)?,
            None => GameFlow::new(room_id, players, spec.game_seed, config.clone())?,
        };

        let (commands_tx, commands_rx) = mpsc::channel(config.queue_capacity.max(1));
        let status = Arc::new(RwLock::new(RoomStatus::Running));
        let cancel = CancellationToken::new();
        let done = CancellationToken::new();
        let handle = RoomHandle::new(
            room_id,
            commands_tx.clone(),
            status.clone(),
            cancel.clone(),
            done.clone(),
        );

        let task = RoomTask {
            flow,
            commands_rx,
            commands_tx,
            status,
            cancel,
            done,
            broadcaster: self.broadcaster.clone(),
            publisher: self.publisher.clone(),
            bots,
            bot_rng: ChaCha8Rng::seed_from_u64(derive_bot_seed(spec.game_seed, PLAYERS as u8)),
            tickets: HashMap::new(),
            timer: None,
        };

        match self.rooms.entry(room_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                return Err(DomainError::room(
                    RoomErrorKind::AlreadyExists,
                    format!("room {room_id} already exists"),
                ));
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let join = tokio::spawn(task.run());
                slot.insert(RoomEntry {
                    handle: handle.clone(),
                    task: join,
                });
            }
        }
        info!(room_id = %room_id, game_seed = spec.game_seed, "Room created");
        Ok(handle)
    }

    pub fn get(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.get(&room_id).map(|entry| entry.handle.clone())
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// The inbound entry point: route `action` to its room's queue.
    pub async fn submit_action(&self, room_id: RoomId, action: GameAction) -> ActionResult {
        match self.get(room_id) {
            Some(handle) => handle.submit(action).await,
            None => ActionResult::rejected(&not_found(room_id), None),
        }
    }

    pub async fn snapshot(&self, room_id: RoomId) -> Result<PhaseUpdate, DomainError> {
        let handle = self.get(room_id).ok_or_else(|| not_found(room_id))?;
        handle.snapshot().await
    }

    pub fn status(&self, room_id: RoomId) -> Option<RoomStatus> {
        self.get(room_id).map(|handle| handle.status())
    }

    /// Tear a room down: pending bot delays are cancelled and queued actions
    /// are rejected with ROOM_CLOSED.
    pub async fn close_room(&self, room_id: RoomId) -> Result<(), DomainError> {
        let (_, entry) = self
            .rooms
            .remove(&room_id)
            .ok_or_else(|| not_found(room_id))?;
        entry.handle.cancel();
        if let Err(err) = entry.task.await {
            warn!(room_id = %room_id, error = %err, "Room loop ended abnormally");
        }
        info!(room_id = %room_id, "Room closed");
        Ok(())
    }

    pub async fn close_all(&self) {
        for room_id in self.room_ids() {
            let _ = self.close_room(room_id).await;
        }
    }
}

fn not_found(room_id: RoomId) -> DomainError {
    DomainError::room(RoomErrorKind::NotFound, format!("room {room_id} not found"))
}

fn build_bots(seats: &[SeatSpec], game_seed: u64) -> Result<HashMap<Seat, BotSeat>, DomainError> {
    let mut bots = HashMap::new();
    for (i, seat) in seats.iter().enumerate() {
        let Some(config) = &seat.bot else {
            continue;
        };
        let seat_no = i as Seat;
        let seed = config.seed.unwrap_or_else(|| derive_bot_seed(game_seed, seat_no));
        let mut config = config.clone();
        config.seed = Some(seed);
        let policy = create_policy(&config).ok_or_else(|| {
            DomainError::invalid(
                InvalidActionKind::MalformedPayload,
                format!("unknown bot policy {}", config.policy),
            )
        })?;
        bots.insert(
            seat_no,
            BotSeat {
                policy,
                fallback: Arc::new(RandomPlayer::new(Some(seed ^ 0x5eed))),
            },
        );
    }
    Ok(bots)
}
