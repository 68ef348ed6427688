use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::config::GameConfig;
use crate::domain::game_transition::DomainEvent;
use crate::domain::state::GamePhase;
use crate::errors::ErrorCode;
use crate::protocol::GameAction;

fn humans() -> Vec<SeatSpec> {
    ["ann", "bo", "cy", "di"].map(SeatSpec::human).to_vec()
}

fn bots() -> Vec<SeatSpec> {
    ["ann", "bo", "cy", "di"].map(SeatSpec::bot).to_vec()
}

fn registry() -> (RoomRegistry, Arc<MemoryBroadcaster>, Arc<MemoryPublisher>) {
    let broadcaster = Arc::new(MemoryBroadcaster::new());
    let publisher = Arc::new(MemoryPublisher::new());
    let registry = RoomRegistry::new(
        GameConfig::for_tests(),
        broadcaster.clone(),
        publisher.clone(),
    );
    (registry, broadcaster, publisher)
}

#[tokio::test]
async fn unknown_room_is_reported_as_data() {
    let (registry, _, _) = registry();
    let result = registry
        .submit_action(crate::domain::RoomId::new(), GameAction::start_game("ann"))
        .await;
    assert!(!result.success);
    assert_eq!(result.error_code(), Some(ErrorCode::RoomNotFound));
}

#[tokio::test]
async fn start_game_is_applied_and_broadcast() {
    let (registry, broadcaster, publisher) = registry();
    let handle = registry.create_room(RoomSpec::new(humans(), 11)).unwrap();
    let room_id = handle.room_id();

    let result = registry
        .submit_action(room_id, GameAction::start_game("ann"))
        .await;
    assert!(result.success, "{result:?}");
    let snapshot = result.phase_snapshot.unwrap();
    assert_ne!(snapshot.phase, GamePhase::Waiting);

    let sequences: Vec<u64> = broadcaster
        .for_room(room_id)
        .iter()
        .map(|u| u.sequence)
        .collect();
    assert!(sequences.len() >= 2);
    assert!(sequences.windows(2).all(|w| w[0] < w[1]));
    assert!(publisher
        .for_room(room_id)
        .iter()
        .any(|e| matches!(e, DomainEvent::RoundStarted { .. })));

    let again = registry
        .submit_action(room_id, GameAction::start_game("bo"))
        .await;
    assert!(!again.success);
}

#[tokio::test]
async fn duplicate_room_ids_are_refused() {
    let (registry, _, _) = registry();
    let spec = RoomSpec::new(humans(), 1);
    registry.create_room(spec.clone()).unwrap();
    let err = registry.create_room(spec).err().unwrap();
    assert_eq!(err.code(), ErrorCode::RoomAlreadyExists);
}

#[tokio::test]
async fn closing_a_room_rejects_later_actions() {
    let (registry, _, _) = registry();
    let handle = registry.create_room(RoomSpec::new(humans(), 3)).unwrap();
    registry.close_room(handle.room_id()).await.unwrap();

    assert_eq!(handle.status(), RoomStatus::Closed);
    let result = handle.submit(GameAction::start_game("ann")).await;
    assert_eq!(result.error_code(), Some(ErrorCode::RoomClosed));
    assert!(registry.get(handle.room_id()).is_none());
}

#[tokio::test]
async fn bot_room_plays_to_game_over() {
    let (registry, broadcaster, publisher) = registry();
    let mut config = GameConfig::for_tests();
    config.win.max_rounds = 2;
    let handle = registry
        .create_room(RoomSpec::new(bots(), 5).with_config(config))
        .unwrap();
    let result = handle.submit(GameAction::start_game("ann")).await;
    assert!(result.success);

    tokio::time::timeout(Duration::from_secs(10), handle.finished())
        .await
        .expect("bots finish a two-round game");
    assert_eq!(handle.status(), RoomStatus::Finished);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, GamePhase::GameOver);
    assert!(publisher
        .for_room(handle.room_id())
        .contains(&DomainEvent::GameEnded));
    let updates = broadcaster.for_room(handle.room_id());
    assert_eq!(updates.last().map(|u| u.phase), Some(GamePhase::GameOver));
}

fn slow_bots_config() -> GameConfig {
    let mut config = GameConfig::for_tests();
    config.bot_delay_min = Duration::from_millis(300);
    config.bot_delay_max = Duration::from_millis(300);
    config
}

#[tokio::test]
async fn closing_a_room_cancels_pending_bot_delays() {
    let (registry, broadcaster, publisher) = registry();
    let handle = registry
        .create_room(RoomSpec::new(bots(), 9).with_config(slow_bots_config()))
        .unwrap();
    let room_id = handle.room_id();
    let started = handle.submit(GameAction::start_game("ann")).await;
    assert!(started.success);
    let version = started.phase_snapshot.unwrap().version;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let updates = broadcaster.for_room(room_id);
    let events = publisher.for_room(room_id).len();
    assert_eq!(updates.last().map(|u| u.version), Some(version));

    registry.close_room(room_id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(handle.status(), RoomStatus::Closed);
    assert_eq!(broadcaster.for_room(room_id), updates);
    assert_eq!(publisher.for_room(room_id).len(), events);
}

#[tokio::test]
async fn cancelled_bot_ticket_never_submits() {
    let players = ["ann", "bo", "cy", "di"]
        .map(|n| crate::domain::Player::new(n, true))
        .to_vec();
    let mut flow = crate::services::game_flow::GameFlow::new(
        crate::domain::RoomId::new(),
        players,
        21,
        GameConfig::for_tests(),
    )
    .unwrap();
    flow.handle_action(&GameAction::start_game("ann")).unwrap();
    let seat = flow.bots_to_act()[0];

    let policy: Arc<dyn crate::ai::BotPolicy> = Arc::new(crate::ai::RandomPlayer::new(Some(1)));
    let bot = super::bots::BotSeat {
        policy: policy.clone(),
        fallback: policy,
    };
    let (commands, mut queue) = tokio::sync::mpsc::channel(4);
    let room_token = tokio_util::sync::CancellationToken::new();
    let request = super::bots::BotRequest {
        room_id: flow.room_id(),
        seat,
        view: flow.view_for(seat),
        delay: Duration::from_millis(300),
    };
    let ticket = super::bots::spawn_bot(request, &bot, commands, room_token.child_token());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!ticket.is_finished());
    room_token.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(ticket.is_finished());
    assert!(queue.try_recv().is_err());
}
