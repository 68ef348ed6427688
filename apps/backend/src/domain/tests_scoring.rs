use crate::domain::scoring::{apply_round_scoring, check_game_over, ScoringRules, WinCondition};
use crate::domain::test_state_helpers::{empty_hands, make_game_state, MakeGameStateArgs};
use crate::errors::domain::DomainError;

#[test]
fn raw_delta_table() {
    let rules = ScoringRules::default();
    assert_eq!(rules.raw_delta(3, 3), 8);
    assert_eq!(rules.raw_delta(1, 1), 6);
    assert_eq!(rules.raw_delta(0, 0), 3);
    assert_eq!(rules.raw_delta(2, 5), -3);
    assert_eq!(rules.raw_delta(4, 1), -3);
    assert_eq!(rules.raw_delta(0, 2), -2);

    let harsh = ScoringRules {
        zero_miss_penalty: 5,
        ..ScoringRules::default()
    };
    assert_eq!(harsh.raw_delta(0, 2), -7);
    assert_eq!(harsh.raw_delta(1, 3), -2);
}

#[test]
fn multiplier_scales_every_delta() {
    let mut state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            redeal_multiplier: 3,
            scores: [10, 0, -4, 7],
            declared: [Some(2), Some(0), Some(3), Some(1)],
            captured: [2, 0, 5, 1],
            ..Default::default()
        },
    );
    let record = apply_round_scoring(&mut state, &ScoringRules::default()).unwrap();

    let deltas: Vec<i32> = record.lines.iter().map(|l| l.delta).collect();
    assert_eq!(deltas, vec![21, 9, -6, 18]);
    let totals: Vec<i32> = state.players.iter().map(|p| p.score).collect();
    assert_eq!(totals, vec![31, 9, -10, 25]);
    assert_eq!(record.redeal_multiplier, 3);
    assert_eq!(state.history, vec![record]);
}

#[test]
fn scoring_requires_all_piles_captured() {
    let mut state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            declared: [Some(2), Some(0), Some(3), Some(1)],
            captured: [2, 0, 4, 1],
            ..Default::default()
        },
    );
    let before = state.clone();
    assert!(matches!(
        apply_round_scoring(&mut state, &ScoringRules::default()),
        Err(DomainError::Invariant(_))
    ));
    assert_eq!(state, before);
}

#[test]
fn game_over_on_score_with_ties() {
    let state = make_game_state(
        empty_hands(),
        MakeGameStateArgs {
            scores: [52, 12, 52, 49],
            ..Default::default()
        },
    );
    assert_eq!(
        check_game_over(&state, &WinCondition::default()),
        Some(vec![0, 2])
    );
}

#[test]
fn game_over_on_round_limit() {
    let mut args = MakeGameStateArgs {
        scores: [10, 30, -2, 4],
        round_number: 19,
        ..Default::default()
    };
    let state = make_game_state(empty_hands(), args.clone());
    assert_eq!(check_game_over(&state, &WinCondition::default()), None);

    args.round_number = 20;
    let state = make_game_state(empty_hands(), args);
    assert_eq!(
        check_game_over(&state, &WinCondition::default()),
        Some(vec![1])
    );
}
