//! Outbound seam for phase updates.
//!
//! The room loop awaits every `publish` (bounded by the configured ack
//! timeout) before it dequeues the next action, so a room's updates reach
//! the broadcaster strictly in sequence order.

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::domain::snapshot::{PhaseUpdate, RoomId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("no subscriber for room {0}")]
    NoSubscribers(RoomId),
    #[error("broadcast transport failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Deliver one update. Returning is the acknowledgment.
    async fn publish(&self, update: &PhaseUpdate) -> Result<(), BroadcastError>;
}

/// Fan-out over a tokio broadcast channel. Subscribers redact with
/// [`PhaseUpdate::for_player`] before anything leaves the process.
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<PhaseUpdate>,
}

impl ChannelBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PhaseUpdate> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl Broadcaster for ChannelBroadcaster {
    async fn publish(&self, update: &PhaseUpdate) -> Result<(), BroadcastError> {
        self.tx
            .send(update.clone())
            .map(|_| ())
            .map_err(|_| BroadcastError::NoSubscribers(update.room_id))
    }
}

/// Keeps every update in memory; used by tests and the simulation binary.
#[derive(Default)]
pub struct MemoryBroadcaster {
    updates: Mutex<Vec<PhaseUpdate>>,
}

impl MemoryBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<PhaseUpdate> {
        self.updates.lock().clone()
    }

    pub fn for_room(&self, room_id: RoomId) -> Vec<PhaseUpdate> {
        self.updates
            .lock()
            .iter()
            .filter(|u| u.room_id == room_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Broadcaster for MemoryBroadcaster {
    async fn publish(&self, update: &PhaseUpdate) -> Result<(), BroadcastError> {
        self.updates.lock().push(update.clone());
        Ok(())
    }
}
