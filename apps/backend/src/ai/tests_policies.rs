use crate::ai::{get_bot_decision, registry, AiError, BotPolicy, Heuristic, RandomPlayer};
use crate::domain::phases::{ActionType, PhaseState};
use crate::domain::redeal::RedealVote;
use crate::domain::state::GameState;
use crate::domain::test_state_helpers::{make_game_state, pieces, MakeGameStateArgs};
use crate::domain::tricks::{play_pieces, start_turn};
use crate::domain::PlayerView;
use crate::protocol::ActionPayload;

fn one_piece_each(declared: [Option<u8>; 4], captured: [u8; 4]) -> GameState {
    make_game_state(
        [
            pieces(&["HORSE_RED"]),
            pieces(&["SOLDIER_BLACK"]),
            pieces(&["CANNON_RED"]),
            pieces(&["CHARIOT_BLACK"]),
        ],
        MakeGameStateArgs {
            declared,
            captured,
            ..Default::default()
        },
    )
}

#[test]
fn at_target_bot_with_no_weaker_piece_plays_it_anyway() {
    // Seat 1 holds only SOLDIER_BLACK and has already met its declaration.
    let mut state = one_piece_each([Some(3), Some(1), Some(2), Some(1)], [3, 1, 2, 1]);
    start_turn(&mut state, 1);

    let view = PlayerView::build(&state, &PhaseState::Turn, 1, 2);
    assert_eq!(view.declared, Some(1));
    assert_eq!(view.captured, 1);
    assert!(view.at_target());
    assert!(view.is_leading());
    let public = view.phase_data.player("bo").unwrap();
    assert_eq!((public.declared, public.captured_piles), (Some(1), 1));

    let action = get_bot_decision(&Heuristic::new(), &view).unwrap();
    assert_eq!(
        action.payload,
        ActionPayload::PlayPieces {
            pieces: pieces(&["SOLDIER_BLACK"])
        }
    );

    // The lead is the only competing single until someone beats it; the
    // engine accepts it like any other play.
    play_pieces(&mut state, 1, &pieces(&["SOLDIER_BLACK"])).unwrap();
}

#[test]
fn at_target_follower_sheds_weakest() {
    let mut state = make_game_state(
        [
            pieces(&["HORSE_RED", "SOLDIER_RED"]),
            pieces(&["GENERAL_RED", "SOLDIER_BLACK"]),
            pieces(&["CANNON_RED", "CANNON_BLACK"]),
            pieces(&["CHARIOT_BLACK", "ELEPHANT_RED"]),
        ],
        MakeGameStateArgs {
            declared: [Some(2), Some(1), Some(2), Some(1)],
            captured: [2, 1, 2, 1],
            ..Default::default()
        },
    );
    start_turn(&mut state, 0);
    play_pieces(&mut state, 0, &pieces(&["HORSE_RED"])).unwrap();

    let view = PlayerView::build(&state, &PhaseState::Turn, 1, 2);
    let choice = Heuristic::new().choose_play(&view).unwrap();
    assert_eq!(choice, pieces(&["SOLDIER_BLACK"]));
}

#[test]
fn below_target_follower_wins_cheaply() {
    let mut state = make_game_state(
        [
            pieces(&["HORSE_BLACK", "SOLDIER_RED"]),
            pieces(&["GENERAL_RED", "HORSE_RED", "SOLDIER_BLACK"]),
            pieces(&["CANNON_RED", "CANNON_BLACK"]),
            pieces(&["CHARIOT_BLACK", "ELEPHANT_RED"]),
        ],
        MakeGameStateArgs {
            declared: [Some(0), Some(2), Some(0), Some(0)],
            ..Default::default()
        },
    );
    start_turn(&mut state, 0);
    play_pieces(&mut state, 0, &pieces(&["HORSE_BLACK"])).unwrap();

    let view = PlayerView::build(&state, &PhaseState::Turn, 1, 2);
    let choice = Heuristic::new().choose_play(&view).unwrap();
    assert_eq!(choice, pieces(&["HORSE_RED"]));
}

#[test]
fn declaration_choices_are_legal() {
    let state = one_piece_each([Some(3), Some(3), Some(2), None], [0; 4]);
    let view = PlayerView::build(&state, &PhaseState::Declaration, 3, 2);
    assert_eq!(view.expected_action, Some(ActionType::Declare));
    assert!(!view.legal_declarations.contains(&0));

    for policy in [
        &Heuristic::new() as &dyn BotPolicy,
        &RandomPlayer::new(Some(9)),
    ] {
        let action = get_bot_decision(policy, &view).unwrap();
        let ActionPayload::Declare { value } = action.payload else {
            panic!("expected a declaration");
        };
        assert!(view.legal_declarations.contains(&(value as u8)));
    }
}

#[test]
fn redeal_vote_produces_response_action() {
    let state = one_piece_each([None; 4], [0; 4]);
    let phase = PhaseState::Preparation {
        vote: Some(RedealVote::open(vec![1])),
    };
    let view = PlayerView::build(&state, &phase, 1, 2);
    let action = get_bot_decision(&Heuristic::new(), &view).unwrap();
    assert_eq!(action.payload, ActionPayload::RedealResponse { accept: true });

    let bystander = PlayerView::build(&state, &phase, 0, 2);
    assert!(matches!(
        get_bot_decision(&Heuristic::new(), &bystander),
        Err(AiError::NothingToDecide(_))
    ));
}

#[test]
fn seeded_random_player_is_deterministic() {
    let mut state = one_piece_each([Some(1), Some(1), Some(1), Some(1)], [0; 4]);
    state.players[0].hand = pieces(&["HORSE_RED", "CANNON_RED", "SOLDIER_RED"]);
    state.round.pieces_played -= 2;
    start_turn(&mut state, 0);
    let view = PlayerView::build(&state, &PhaseState::Turn, 0, 2);

    let run = |seed| {
        let policy = RandomPlayer::new(Some(seed));
        (0..5)
            .map(|_| policy.choose_play(&view).unwrap())
            .collect::<Vec<_>>()
    };
    let a = run(77);
    let b = run(77);
    assert_eq!(a, b);
    assert!(a.iter().all(|set| view.legal_plays.contains(set)));
}

#[test]
fn registered_heuristic_ignores_seat_seed() {
    let mut state = one_piece_each([Some(1), Some(1), Some(1), Some(1)], [0; 4]);
    state.players[0].hand = pieces(&["HORSE_RED", "CANNON_RED", "SOLDIER_RED"]);
    state.round.pieces_played -= 2;
    start_turn(&mut state, 0);
    let view = PlayerView::build(&state, &PhaseState::Turn, 0, 2);

    let factory = registry::by_name(Heuristic::NAME).unwrap();
    let a = (factory.make)(Some(1)).choose_play(&view).unwrap();
    let b = (factory.make)(Some(2)).choose_play(&view).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, Heuristic::new().choose_play(&view).unwrap());
}
