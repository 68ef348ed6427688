use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use liap_backend::domain::PhaseUpdate;
use liap_backend::rooms::{
    BroadcastError, Broadcaster, MemoryBroadcaster, MemoryPublisher, RoomRegistry, SeatSpec,
};
use liap_backend::GameConfig;
use liap_test_support::unique_helpers::unique_seat_names;

pub struct TestRooms {
    pub registry: RoomRegistry,
    pub broadcaster: Arc<MemoryBroadcaster>,
    pub publisher: Arc<MemoryPublisher>,
}

pub fn test_rooms(config: GameConfig) -> TestRooms {
    let broadcaster = Arc::new(MemoryBroadcaster::new());
    let publisher = Arc::new(MemoryPublisher::new());
    let registry = RoomRegistry::new(config, broadcaster.clone(), publisher.clone());
    TestRooms {
        registry,
        broadcaster,
        publisher,
    }
}

pub fn human_seats() -> (Vec<SeatSpec>, [String; 4]) {
    let names = unique_seat_names("human");
    (names.clone().map(SeatSpec::human).to_vec(), names)
}

pub fn bot_seats() -> (Vec<SeatSpec>, [String; 4]) {
    let names = unique_seat_names("bot");
    (names.clone().map(SeatSpec::bot).to_vec(), names)
}

/// Acknowledges each update only after `delay`.
pub struct SlowBroadcaster {
    pub delay: Duration,
}

#[async_trait]
impl Broadcaster for SlowBroadcaster {
    async fn publish(&self, _update: &PhaseUpdate) -> Result<(), BroadcastError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
