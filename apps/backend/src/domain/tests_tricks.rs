use crate::domain::combos::ComboKind;
use crate::domain::state::GameState;
use crate::domain::test_state_helpers::{make_game_state, pieces, MakeGameStateArgs};
use crate::domain::tricks::{legal_plays, play_pieces, resolve_turn, start_turn, turn_winner};
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind, RuleKind};

fn state_with(hands: [&[&str]; 4]) -> GameState {
    make_game_state(hands.map(pieces), MakeGameStateArgs::default())
}

#[test]
fn highest_same_kind_combo_wins_and_takes_piles() {
    let mut state = state_with([
        &["HORSE_RED", "HORSE_RED"],
        &["CANNON_BLACK", "SOLDIER_RED"],
        &["CHARIOT_RED", "CHARIOT_RED"],
        &["ADVISOR_BLACK", "GENERAL_RED"],
    ]);
    start_turn(&mut state, 0);

    let lead = play_pieces(&mut state, 0, &pieces(&["HORSE_RED", "HORSE_RED"])).unwrap();
    assert_eq!(lead.combo.map(|c| c.kind), Some(ComboKind::Pair));
    assert_eq!(lead.next_player, Some(1));

    let discard = play_pieces(&mut state, 1, &pieces(&["CANNON_BLACK", "SOLDIER_RED"])).unwrap();
    assert_eq!(discard.combo, None);

    play_pieces(&mut state, 2, &pieces(&["CHARIOT_RED", "CHARIOT_RED"])).unwrap();
    // Strong but not a pair: cannot win.
    let last = play_pieces(&mut state, 3, &pieces(&["GENERAL_RED", "ADVISOR_BLACK"])).unwrap();
    assert!(last.turn_complete);
    assert_eq!(last.next_player, None);

    let resolution = resolve_turn(&mut state).unwrap();
    assert_eq!(resolution.winner, 2);
    assert_eq!(resolution.piles_awarded, 2);
    assert!(resolution.round_complete);
    assert_eq!(state.players[2].captured_piles, 2);
    assert_eq!(state.round.last_turn_winner, Some(2));
}

#[test]
fn equal_values_go_to_the_earlier_play() {
    let mut state = state_with([&["HORSE_RED"], &["SOLDIER_BLACK"], &["HORSE_RED"], &["CANNON_RED"]]);
    start_turn(&mut state, 1);
    play_pieces(&mut state, 1, &pieces(&["SOLDIER_BLACK"])).unwrap();
    play_pieces(&mut state, 2, &pieces(&["HORSE_RED"])).unwrap();
    play_pieces(&mut state, 3, &pieces(&["CANNON_RED"])).unwrap();
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED"])).unwrap();

    let turn = state.turn.as_ref().unwrap();
    assert_eq!(turn_winner(turn), Some(2));
}

#[test]
fn leading_play_must_be_a_combo() {
    let mut state = state_with([
        &["HORSE_RED", "CANNON_RED"],
        &["SOLDIER_RED", "SOLDIER_RED"],
        &["SOLDIER_BLACK", "SOLDIER_BLACK"],
        &["CANNON_BLACK", "CANNON_BLACK"],
    ]);
    start_turn(&mut state, 0);
    let before = state.clone();

    let err = play_pieces(&mut state, 0, &pieces(&["HORSE_RED", "CANNON_RED"])).unwrap_err();
    assert!(matches!(err, DomainError::RuleViolation(RuleKind::InvalidCombo, _)));
    assert_eq!(state, before, "rejected play must not mutate state");
}

#[test]
fn followers_must_match_piece_count() {
    let mut state = state_with([
        &["HORSE_RED", "CANNON_RED"],
        &["SOLDIER_RED", "SOLDIER_RED"],
        &["SOLDIER_BLACK", "SOLDIER_BLACK"],
        &["CANNON_BLACK", "CANNON_BLACK"],
    ]);
    start_turn(&mut state, 0);
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED"])).unwrap();
    assert!(matches!(
        play_pieces(&mut state, 1, &pieces(&["SOLDIER_RED", "SOLDIER_RED"])),
        Err(DomainError::RuleViolation(RuleKind::WrongPieceCount, _))
    ));
    assert!(matches!(
        play_pieces(&mut state, 1, &[]),
        Err(DomainError::RuleViolation(RuleKind::WrongPieceCount, _))
    ));
}

#[test]
fn empty_lead_is_rejected() {
    let mut state = state_with([&["HORSE_RED"], &["SOLDIER_RED"], &["SOLDIER_BLACK"], &["CANNON_BLACK"]]);
    start_turn(&mut state, 0);
    assert!(matches!(
        play_pieces(&mut state, 0, &[]),
        Err(DomainError::RuleViolation(RuleKind::WrongPieceCount, _))
    ));
}

#[test]
fn pieces_must_be_owned_with_multiplicity() {
    let mut state = state_with([
        &["HORSE_RED", "CANNON_RED"],
        &["SOLDIER_RED", "SOLDIER_RED"],
        &["SOLDIER_BLACK", "SOLDIER_BLACK"],
        &["CANNON_BLACK", "CANNON_BLACK"],
    ]);
    start_turn(&mut state, 0);
    assert!(matches!(
        play_pieces(&mut state, 0, &pieces(&["HORSE_RED", "HORSE_RED"])),
        Err(DomainError::RuleViolation(RuleKind::PieceNotInHand, _))
    ));
    assert!(matches!(
        play_pieces(&mut state, 0, &pieces(&["GENERAL_RED"])),
        Err(DomainError::RuleViolation(RuleKind::PieceNotInHand, _))
    ));
}

#[test]
fn turn_order_and_duplicate_plays() {
    let mut state = state_with([&["HORSE_RED"], &["SOLDIER_RED"], &["SOLDIER_BLACK"], &["CANNON_BLACK"]]);
    start_turn(&mut state, 0);
    assert!(matches!(
        play_pieces(&mut state, 2, &pieces(&["SOLDIER_BLACK"])),
        Err(DomainError::InvalidAction(InvalidActionKind::OutOfTurn, _))
    ));
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED"])).unwrap();
    assert!(matches!(
        play_pieces(&mut state, 0, &pieces(&["HORSE_RED"])),
        Err(DomainError::Concurrency(ConflictKind::AlreadyPlayed, _))
    ));
}

#[test]
fn follower_legal_plays_include_matching_combos_and_a_discard() {
    let mut state = state_with([
        &["HORSE_RED", "HORSE_RED", "ELEPHANT_RED"],
        &["SOLDIER_RED", "SOLDIER_RED", "GENERAL_BLACK"],
        &["CANNON_BLACK", "ADVISOR_RED", "CHARIOT_BLACK"],
        &["CANNON_RED", "CANNON_RED", "SOLDIER_BLACK"],
    ]);
    start_turn(&mut state, 0);
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED", "HORSE_RED"])).unwrap();

    let seat1 = legal_plays(&state, 1);
    assert_eq!(seat1, vec![pieces(&["SOLDIER_RED", "SOLDIER_RED"])]);

    let seat2 = legal_plays(&state, 2);
    assert_eq!(seat2, vec![pieces(&["CANNON_BLACK", "CHARIOT_BLACK"])]);

    // Not their turn yet, but legality is independent of turn order.
    let seat3 = legal_plays(&state, 3);
    assert!(seat3.contains(&pieces(&["CANNON_RED", "CANNON_RED"])));
    assert!(seat3.contains(&pieces(&["SOLDIER_BLACK", "CANNON_RED"])));
}

#[test]
fn leader_legal_plays_are_all_combos() {
    let mut state = state_with([
        &["CHARIOT_RED", "HORSE_RED", "CANNON_RED"],
        &["SOLDIER_RED"],
        &["SOLDIER_BLACK"],
        &["CANNON_BLACK"],
    ]);
    start_turn(&mut state, 0);
    let plays = legal_plays(&state, 0);
    // three singles plus the straight
    assert_eq!(plays.len(), 4);
    assert!(plays.contains(&pieces(&["CANNON_RED", "HORSE_RED", "CHARIOT_RED"])));
}
