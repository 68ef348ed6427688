use crate::domain::phases::PhaseState;
use crate::domain::redeal::{RedealChoice, RedealVote};
use crate::domain::snapshot::{phase_data, private_hands, PhaseData, PhaseUpdate, RoomId};
use crate::domain::state::GamePhase;
use crate::domain::test_state_helpers::{empty_hands, make_game_state, pieces, MakeGameStateArgs};
use crate::domain::tricks::{play_pieces, start_turn};

#[test]
fn declaration_data_exposes_current_declarer_and_forbidden_value() {
    let state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            round_starter: 1,
            declared: [None, Some(3), Some(2), Some(1)],
            ..Default::default()
        },
    );
    let PhaseData::Declaration(data) = phase_data(&state, &PhaseState::Declaration) else {
        panic!("expected declaration data");
    };
    assert_eq!(data.current_declarer.as_deref(), Some("ann"));
    assert_eq!(data.declared_total, 6);
    assert_eq!(data.forbidden_value, Some(2));
    assert_eq!(data.round.turn_order, vec!["bo", "cy", "di", "ann"]);
}

#[test]
fn preparation_data_tracks_vote_progress() {
    let state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    let mut vote = RedealVote::open(vec![1, 3]);
    vote.record(3, RedealChoice::Decline).unwrap();

    let PhaseData::Preparation(data) = phase_data(&state, &PhaseState::Preparation { vote: Some(vote) })
    else {
        panic!("expected preparation data");
    };
    assert_eq!(data.weak_players, vec!["bo", "di"]);
    assert_eq!(data.pending_responses, vec!["bo"]);
    assert_eq!(data.responses.get("di"), Some(&RedealChoice::Decline));
}

#[test]
fn turn_data_lists_public_plays() {
    let mut state = make_game_state(
        [
            pieces(&["HORSE_RED", "HORSE_RED"]),
            pieces(&["SOLDIER_RED", "SOLDIER_RED"]),
            pieces(&["CANNON_BLACK", "SOLDIER_BLACK"]),
            pieces(&["ELEPHANT_RED", "CHARIOT_BLACK"]),
        ],
        MakeGameStateArgs::default(),
    );
    start_turn(&mut state, 0);
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED", "HORSE_RED"])).unwrap();

    let PhaseData::Turn(data) = phase_data(&state, &PhaseState::Turn) else {
        panic!("expected turn data");
    };
    let turn = data.turn.unwrap();
    assert_eq!(turn.required_piece_count, Some(2));
    assert_eq!(turn.plays[0].player, "ann");
    assert_eq!(turn.plays[0].combo_value, 12);
    assert_eq!(data.current_player.as_deref(), Some("bo"));
    assert_eq!(data.players[0].hand_size, 0);
    assert_eq!(data.players[1].hand_size, 2);
}

#[test]
fn public_payload_never_contains_hands() {
    let state = make_game_state(
        [
            pieces(&["GENERAL_RED"]),
            pieces(&["SOLDIER_RED"]),
            pieces(&["CANNON_BLACK"]),
            pieces(&["ELEPHANT_RED"]),
        ],
        MakeGameStateArgs::default(),
    );
    let update = PhaseUpdate {
        room_id: RoomId::new(),
        sequence: 1,
        version: 1,
        phase: GamePhase::Declaration,
        allowed_actions: PhaseState::Declaration.allowed_actions().to_vec(),
        phase_data: phase_data(&state, &PhaseState::Declaration),
        hands: private_hands(&state),
    };

    let public = serde_json::to_string(&update).unwrap();
    assert!(!public.contains("GENERAL_RED"));
    assert!(update.public_map().contains_key("phase_data"));

    let own = serde_json::to_value(update.for_player("ann")).unwrap();
    assert_eq!(own["hand"], serde_json::json!(["GENERAL_RED"]));
    let other = serde_json::to_value(update.for_player("bo")).unwrap();
    assert!(!other.to_string().contains("GENERAL_RED"));
}

#[test]
fn phase_data_is_adjacently_tagged() {
    let state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    let value = serde_json::to_value(phase_data(&state, &PhaseState::Waiting)).unwrap();
    assert_eq!(value["phase"], "WAITING");
    assert_eq!(value["data"]["players"][2]["name"], "cy");
}
