use tracing::{debug, info};

use super::{FlowOutput, GameFlow, SeededStart};
use crate::domain::dealing::deal_hands;
use crate::domain::declaration::finalize_zero_streaks;
use crate::domain::game_transition::DomainEvent;
use crate::domain::phases::PhaseState;
use crate::domain::redeal::{weak_seats, RedealVote};
use crate::domain::combos::remove_pieces;
use crate::domain::rules::{FULL_SET_SIZE, PIECES_PER_HAND, PLAYERS, TOTAL_PILES};
use crate::domain::scoring::{apply_round_scoring, check_game_over};
use crate::domain::seed_derivation::derive_dealing_seed;
use crate::domain::state::{GamePhase, RoundState, Seat};
use crate::domain::tricks::start_turn;
use crate::domain::{full_set, Piece, PieceColor, PieceName};
use crate::errors::domain::{DomainError, InvalidActionKind};

const GENERAL_RED: Piece = Piece::new(PieceName::General, PieceColor::Red);

impl GameFlow {
    /// Start the next round: pick the starter, reset per-round fields and deal.
    pub(super) fn begin_round(&mut self) -> Result<(), DomainError> {
        let round = &self.state.round;
        let next_starter = round.last_turn_winner.unwrap_or(round.round_starter);
        let round_number = round.round_number + 1;

        self.state.round = RoundState {
            round_number,
            round_starter: next_starter,
            ..RoundState::empty()
        };
        self.state.turn = None;
        info!(
            room_id = %self.room_id,
            round_number,
            "Round started"
        );
        self.deal(None)
    }

    /// Deal every hand for the current deal attempt and open a redeal vote
    /// when weak hands remain eligible.
    pub(super) fn deal(&mut self, seeded: Option<[Vec<Piece>; PLAYERS]>) -> Result<(), DomainError> {
        let hands = match seeded {
            Some(hands) => hands,
            None => deal_hands(derive_dealing_seed(
                self.state.game_seed,
                self.state.round.round_number,
                self.state.round.deal_attempt,
            )),
        };
        let in_hands: usize = hands.iter().map(Vec::len).sum();
        for (player, hand) in self.state.players.iter_mut().zip(hands) {
            player.reset_for_round();
            player.hand = hand;
        }
        self.state.round.pieces_played = FULL_SET_SIZE.saturating_sub(in_hands);

        if self.state.round.round_number == 1 && self.state.round.deal_attempt == 0 {
            if let Some(holder) = self.holder_of(GENERAL_RED) {
                self.state.round.round_starter = holder;
            }
        }

        let vote = if self.state.round.redeal_count < self.config.max_redeals {
            let weak = weak_seats(&self.state);
            (!weak.is_empty()).then(|| RedealVote::open(weak))
        } else {
            None
        };
        debug!(
            room_id = %self.room_id,
            deal_attempt = self.state.round.deal_attempt,
            weak = ?vote.as_ref().map(|v| v.eligible().to_vec()),
            "Hands dealt"
        );
        self.phase = PhaseState::Preparation { vote };
        Ok(())
    }

    /// An accepted redeal: raise the multiplier, hand the start to the
    /// requester and deal again.
    pub(super) fn apply_redeal(
        &mut self,
        requester: Seat,
        out: &mut FlowOutput,
    ) -> Result<(), DomainError> {
        let round = &mut self.state.round;
        round.redeal_multiplier = round.redeal_multiplier.saturating_add(1);
        round.redeal_count += 1;
        round.deal_attempt += 1;
        round.round_starter = requester;
        let multiplier = round.redeal_multiplier;

        info!(
            room_id = %self.room_id,
            seat = requester,
            multiplier,
            "Redeal accepted"
        );
        out.events.push(DomainEvent::RedealAccepted {
            requester: self.state.player(requester).name.clone(),
            multiplier,
        });
        self.deal(None)
    }

    /// Declarations are final: roll zero streaks and open the first turn.
    pub(super) fn begin_play(&mut self) -> Result<(), DomainError> {
        finalize_zero_streaks(&mut self.state);
        let starter = self.state.round.round_starter;
        start_turn(&mut self.state, starter);
        self.phase = PhaseState::Turn;
        Ok(())
    }

    /// Apply round scoring and decide whether the game is over.
    pub(super) fn score_round(&mut self, out: &mut FlowOutput) -> Result<(), DomainError> {
        let record = apply_round_scoring(&mut self.state, &self.config.scoring)?;
        let winners = check_game_over(&self.state, &self.config.win);
        info!(
            room_id = %self.room_id,
            round_number = record.round_number,
            multiplier = record.redeal_multiplier,
            game_over = winners.is_some(),
            "Round scored"
        );
        out.events.push(DomainEvent::RoundEnded {
            round_number: record.round_number,
            deltas: record
                .lines
                .iter()
                .map(|l| (l.player_name.clone(), l.delta))
                .collect(),
        });
        self.phase = PhaseState::Scoring { record, winners };
        Ok(())
    }

    fn holder_of(&self, piece: Piece) -> Option<Seat> {
        self.state
            .players
            .iter()
            .position(|p| p.hand.contains(&piece))
            .map(|i| i as Seat)
    }

    pub(super) fn apply_seed(&mut self, seed: SeededStart) -> Result<(), DomainError> {
        if seed.phase == GamePhase::Waiting {
            for (player, score) in self.state.players.iter_mut().zip(seed.scores) {
                player.score = score;
            }
            return Ok(());
        }
        if !matches!(
            seed.phase,
            GamePhase::Preparation | GamePhase::Declaration | GamePhase::Turn
        ) {
            return Err(Self::unsupported_seed(seed.phase));
        }
        check_seed(&seed)?;

        self.state.round = RoundState {
            round_number: seed.round_number.max(1),
            redeal_multiplier: seed.redeal_multiplier.max(1),
            ..RoundState::empty()
        };
        self.deal(seed.hands)?;
        if let Some(starter) = seed.round_starter {
            self.state.round.round_starter = starter;
        }
        for (seat, player) in self.state.players.iter_mut().enumerate() {
            player.score = seed.scores[seat];
            player.declared = seed.declarations[seat];
            player.captured_piles = seed.captured[seat];
            player.consecutive_zero_declarations = seed.zero_streaks[seat];
        }

        match seed.phase {
            GamePhase::Preparation => {
                // Re-run detection so a seeded starter is reflected in vote order.
                let weak = weak_seats(&self.state);
                let vote = (!weak.is_empty()).then(|| RedealVote::open(weak));
                self.phase = PhaseState::Preparation { vote };
            }
            GamePhase::Declaration => self.phase = PhaseState::Declaration,
            _ => {
                if self.state.players.iter().any(|p| p.declared.is_none()) {
                    return Err(DomainError::invalid(
                        InvalidActionKind::MalformedPayload,
                        "a game seeded into TURN needs every declaration",
                    ));
                }
                let starter = self.state.round.round_starter;
                start_turn(&mut self.state, starter);
                self.phase = PhaseState::Turn;
            }
        }
        self.epoch += 1;
        Ok(())
    }
}

fn malformed_seed(detail: String) -> DomainError {
    DomainError::invalid(InvalidActionKind::MalformedPayload, detail)
}

/// Structural checks on a seeded deal, before any of it touches the state.
fn check_seed(seed: &SeededStart) -> Result<(), DomainError> {
    if let Some(starter) = seed.round_starter {
        if starter as usize >= PLAYERS {
            return Err(malformed_seed(format!("seeded starter {starter} is not a seat")));
        }
    }

    let hand_size = match &seed.hands {
        Some(hands) => {
            let size = hands[0].len();
            if hands.iter().any(|h| h.len() != size) {
                return Err(malformed_seed("seeded hands differ in size".into()));
            }
            if size > PIECES_PER_HAND {
                return Err(malformed_seed(format!(
                    "seeded hands hold {size} pieces, at most {PIECES_PER_HAND} allowed"
                )));
            }
            let seeded: Vec<Piece> = hands.iter().flatten().copied().collect();
            if remove_pieces(&full_set(), &seeded).is_none() {
                return Err(malformed_seed("seeded hands are not drawn from one set".into()));
            }
            size
        }
        None => PIECES_PER_HAND,
    };

    if seed.phase == GamePhase::Turn {
        let captured: usize = seed.captured.iter().map(|&c| c as usize).sum();
        if captured + hand_size != TOTAL_PILES as usize {
            return Err(malformed_seed(format!(
                "{captured} piles captured with {hand_size} pieces per hand, expected {TOTAL_PILES}"
            )));
        }
    }
    Ok(())
}
