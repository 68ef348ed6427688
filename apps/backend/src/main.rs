//! Bot-only simulation: runs several rooms in parallel until each reaches
//! GAME_OVER and logs a summary per room.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use liap_backend::domain::PhaseData;
use liap_backend::rooms::{ChannelBroadcaster, TracingPublisher};
use liap_backend::telemetry;
use liap_backend::{GameAction, GameConfig, RoomRegistry, RoomSpec, SeatSpec};
use tracing::{error, info, warn};

const SEAT_NAMES: [&str; 4] = ["north", "east", "south", "west"];

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };
    let rooms: usize = env_or("LIAP_SIM_ROOMS", 4);
    let base_seed: u64 = env_or("LIAP_SIM_SEED", 2024);
    let deadline = Duration::from_secs(env_or("LIAP_SIM_TIMEOUT_SECS", 600));

    let broadcaster = Arc::new(ChannelBroadcaster::new(256));
    let registry = RoomRegistry::new(config, broadcaster, Arc::new(TracingPublisher));

    let mut handles = Vec::with_capacity(rooms);
    for i in 0..rooms {
        let seats = SEAT_NAMES.map(SeatSpec::bot).to_vec();
        match registry.create_room(RoomSpec::new(seats, base_seed.wrapping_add(i as u64))) {
            Ok(handle) => handles.push(handle),
            Err(err) => error!(error = %err, "Room could not be created"),
        }
    }
    info!(rooms = handles.len(), base_seed, "Simulation started");

    let runs = handles.iter().map(|handle| async move {
        let started = handle.submit(GameAction::start_game(SEAT_NAMES[0])).await;
        if !started.success {
            warn!(room_id = %handle.room_id(), error = ?started.error, "Start refused");
            return;
        }
        if tokio::time::timeout(deadline, handle.finished()).await.is_err() {
            warn!(room_id = %handle.room_id(), "Room did not finish in time");
            return;
        }
        match handle.snapshot().await {
            Ok(update) => {
                let winners = match &update.phase_data {
                    PhaseData::GameOver(data) => data.winners.clone(),
                    _ => Vec::new(),
                };
                let scores: Vec<(String, i32)> = update
                    .phase_data
                    .players()
                    .iter()
                    .map(|p| (p.name.clone(), p.score))
                    .collect();
                info!(
                    room_id = %handle.room_id(),
                    status = ?handle.status(),
                    version = update.version,
                    winners = ?winners,
                    scores = ?scores,
                    "Room finished"
                );
            }
            Err(err) => warn!(room_id = %handle.room_id(), error = %err, "No final snapshot"),
        }
    });
    join_all(runs).await;

    registry.close_all().await;
    info!("Simulation complete");
}
