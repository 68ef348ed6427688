//! Domain event publisher seam. The core hands each committed event to the
//! injected publisher and does not know whether it is stored.

use parking_lot::Mutex;
use tracing::info;

use crate::domain::game_transition::DomainEvent;
use crate::domain::snapshot::RoomId;

pub trait EventPublisher: Send + Sync {
    fn publish(&self, room_id: RoomId, event: &DomainEvent);
}

/// Writes each event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPublisher;

impl EventPublisher for TracingPublisher {
    fn publish(&self, room_id: RoomId, event: &DomainEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        info!(room_id = %room_id, event = event.name(), payload = %payload, "Domain event");
    }
}

#[derive(Debug, Default)]
pub struct MemoryPublisher {
    events: Mutex<Vec<(RoomId, DomainEvent)>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(RoomId, DomainEvent)> {
        self.events.lock().clone()
    }

    pub fn for_room(&self, room_id: RoomId) -> Vec<DomainEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(id, _)| *id == room_id)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl EventPublisher for MemoryPublisher {
    fn publish(&self, room_id: RoomId, event: &DomainEvent) {
        self.events.lock().push((room_id, event.clone()));
    }
}
