use crate::domain::declaration::{
    expected_declarer, finalize_zero_streaks, legal_declarations, place_declaration,
};
use crate::domain::test_state_helpers::{empty_hands, make_game_state, MakeGameStateArgs};
use crate::errors::domain::{ConflictKind, DomainError, InvalidActionKind, RuleKind};

const STREAK: u8 = 2;

#[test]
fn last_declarer_cannot_complete_forbidden_total() {
    let mut state = make_game_state(empty_hands(), MakeGameStateArgs::default());

    assert!(place_declaration(&mut state, 0, 2, STREAK).is_ok());
    assert!(place_declaration(&mut state, 1, 2, STREAK).is_ok());
    let third = place_declaration(&mut state, 2, 2, STREAK).unwrap();
    assert!(!third.all_declared);
    assert_eq!(third.next_declarer, Some(3));

    // 2 + 2 + 2 + 2 == 8
    let err = place_declaration(&mut state, 3, 2, STREAK).unwrap_err();
    assert!(
        matches!(err, DomainError::RuleViolation(RuleKind::ForbiddenTotal, _)),
        "unexpected error: {err:?}"
    );
    assert_eq!(state.players[3].declared, None);

    let last = place_declaration(&mut state, 3, 1, STREAK).unwrap();
    assert!(last.all_declared);
    assert_eq!(last.next_declarer, None);
    let total: u8 = state.players.iter().filter_map(|p| p.declared).sum();
    assert_eq!(total, 7);
}

#[test]
fn earlier_declarers_are_unconstrained_by_total() {
    let mut state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    assert!(place_declaration(&mut state, 0, 8, STREAK).is_ok());
    // The running total already equals 8; only the last declarer is checked.
    assert!(place_declaration(&mut state, 1, 0, STREAK).is_ok());
    assert!(place_declaration(&mut state, 2, 0, STREAK).is_ok());
    assert!(matches!(
        place_declaration(&mut state, 3, 0, STREAK),
        Err(DomainError::RuleViolation(RuleKind::ForbiddenTotal, _))
    ));
}

#[test]
fn declaration_order_follows_round_starter() {
    let mut state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            round_starter: 2,
            ..Default::default()
        },
    );
    assert_eq!(expected_declarer(&state), Some(2));
    assert!(matches!(
        place_declaration(&mut state, 0, 1, STREAK),
        Err(DomainError::InvalidAction(InvalidActionKind::OutOfTurn, _))
    ));
    place_declaration(&mut state, 2, 1, STREAK).unwrap();
    assert_eq!(expected_declarer(&state), Some(3));
    place_declaration(&mut state, 3, 1, STREAK).unwrap();
    assert_eq!(expected_declarer(&state), Some(0));
}

#[test]
fn out_of_range_values_rejected() {
    let mut state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    for bad in [-1, 9, 300] {
        assert!(matches!(
            place_declaration(&mut state, 0, bad, STREAK),
            Err(DomainError::RuleViolation(RuleKind::DeclarationOutOfRange, _))
        ));
    }
}

#[test]
fn duplicate_declaration_is_a_conflict() {
    let mut state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    place_declaration(&mut state, 0, 3, STREAK).unwrap();
    assert!(matches!(
        place_declaration(&mut state, 0, 3, STREAK),
        Err(DomainError::Concurrency(ConflictKind::DuplicateDeclaration, _))
    ));
}

#[test]
fn zero_streak_blocks_zero() {
    let mut state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            zero_streaks: [2, 1, 0, 0],
            ..Default::default()
        },
    );
    assert!(matches!(
        place_declaration(&mut state, 0, 0, STREAK),
        Err(DomainError::RuleViolation(RuleKind::ZeroStreak, _))
    ));
    assert!(!legal_declarations(&state, 0, STREAK).contains(&0));
    place_declaration(&mut state, 0, 1, STREAK).unwrap();
    // One prior zero is still under the threshold.
    place_declaration(&mut state, 1, 0, STREAK).unwrap();
}

#[test]
fn legal_declarations_exclude_forbidden_value_for_last() {
    let mut state = make_game_state(empty_hands(), MakeGameStateArgs::default());
    assert_eq!(legal_declarations(&state, 0, STREAK), (0..=8).collect::<Vec<u8>>());
    assert!(legal_declarations(&state, 1, STREAK).is_empty());

    place_declaration(&mut state, 0, 3, STREAK).unwrap();
    place_declaration(&mut state, 1, 1, STREAK).unwrap();
    place_declaration(&mut state, 2, 0, STREAK).unwrap();
    let legal = legal_declarations(&state, 3, STREAK);
    assert!(!legal.contains(&4));
    assert_eq!(legal.len(), 8);
}

#[test]
fn zero_streaks_roll_forward() {
    let mut state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            zero_streaks: [1, 3, 0, 0],
            declared: [Some(0), Some(2), Some(0), Some(1)],
            ..Default::default()
        },
    );
    finalize_zero_streaks(&mut state);
    let streaks: Vec<u8> = state
        .players
        .iter()
        .map(|p| p.consecutive_zero_declarations)
        .collect();
    assert_eq!(streaks, vec![2, 0, 1, 0]);
}
