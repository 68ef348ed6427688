//! Play shapes: classifying a set of pieces and comparing plays.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::pieces_types::{Piece, PieceName};
use super::rules::MAX_PLAY_SIZE;

const HIGH_GROUP: [PieceName; 3] = [PieceName::General, PieceName::Advisor, PieceName::Elephant];
const LOW_GROUP: [PieceName; 3] = [PieceName::Chariot, PieceName::Horse, PieceName::Cannon];

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComboKind {
    Single,
    Pair,
    ThreeOfAKind,
    Straight,
    FourOfAKind,
    ExtendedStraight,
    #[serde(rename = "EXTENDED_STRAIGHT_5")]
    ExtendedStraight5,
    FiveOfAKind,
    DoubleStraight,
}

impl ComboKind {
    /// Piece count every combo of this kind has.
    pub const fn size(self) -> usize {
        match self {
            ComboKind::Single => 1,
            ComboKind::Pair => 2,
            ComboKind::ThreeOfAKind | ComboKind::Straight => 3,
            ComboKind::FourOfAKind | ComboKind::ExtendedStraight => 4,
            ComboKind::ExtendedStraight5 | ComboKind::FiveOfAKind => 5,
            ComboKind::DoubleStraight => 6,
        }
    }
}

/// A classified play: its shape and comparative value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub kind: ComboKind,
    pub value: u32,
}

/// Sum of piece strengths.
pub fn combo_value(pieces: &[Piece]) -> u32 {
    pieces.iter().map(|p| p.strength() as u32).sum()
}

/// Classify `pieces` as a combo. `None` means the set is not a legal shape.
pub fn classify(pieces: &[Piece]) -> Option<ComboKind> {
    let n = pieces.len();
    if n == 0 || n > MAX_PLAY_SIZE {
        return None;
    }
    if n == 1 {
        return Some(ComboKind::Single);
    }

    let color = pieces[0].color;
    if pieces.iter().any(|p| p.color != color) {
        return None;
    }

    let mut counts: BTreeMap<PieceName, usize> = BTreeMap::new();
    for p in pieces {
        *counts.entry(p.name).or_default() += 1;
    }
    let all_soldiers = counts.len() == 1 && counts.contains_key(&PieceName::Soldier);

    match n {
        2 => (counts.len() == 1).then_some(ComboKind::Pair),
        3 if all_soldiers => Some(ComboKind::ThreeOfAKind),
        3 => (straight_shape(&counts)? == [1, 1, 1]).then_some(ComboKind::Straight),
        4 if all_soldiers => Some(ComboKind::FourOfAKind),
        4 => (straight_shape(&counts)? == [2, 1, 1]).then_some(ComboKind::ExtendedStraight),
        5 if all_soldiers => Some(ComboKind::FiveOfAKind),
        5 => (straight_shape(&counts)? == [2, 2, 1]).then_some(ComboKind::ExtendedStraight5),
        6 => {
            let double = LOW_GROUP
                .iter()
                .all(|name| counts.get(name).copied() == Some(2));
            (double && counts.len() == 3).then_some(ComboKind::DoubleStraight)
        }
        _ => None,
    }
}

/// Counts per name (descending) when the pieces cover exactly one straight
/// group.
fn straight_shape(counts: &BTreeMap<PieceName, usize>) -> Option<Vec<usize>> {
    let names: BTreeSet<PieceName> = counts.keys().copied().collect();
    let covers = |group: &[PieceName; 3]| names == group.iter().copied().collect();
    if !covers(&HIGH_GROUP) && !covers(&LOW_GROUP) {
        return None;
    }
    let mut shape: Vec<usize> = counts.values().copied().collect();
    shape.sort_unstable_by(|a, b| b.cmp(a));
    Some(shape)
}

pub fn evaluate(pieces: &[Piece]) -> Option<Combo> {
    classify(pieces).map(|kind| Combo {
        kind,
        value: combo_value(pieces),
    })
}

/// True when `challenger` takes the turn from `incumbent`. Only the same
/// kind competes, and equal values stay with the incumbent (earlier play).
pub fn combo_beats(challenger: Combo, incumbent: Combo) -> bool {
    challenger.kind == incumbent.kind && challenger.value > incumbent.value
}

/// Remove `pieces` from `hand`, honouring multiplicity. `None` if the hand
/// does not hold every piece.
pub fn remove_pieces(hand: &[Piece], pieces: &[Piece]) -> Option<Vec<Piece>> {
    let mut remaining = hand.to_vec();
    for piece in pieces {
        let pos = remaining.iter().position(|p| p == piece)?;
        remaining.remove(pos);
    }
    Some(remaining)
}

/// Every distinct legal combo that can be formed from `hand`, ordered by
/// size then value.
pub fn enumerate_combos(hand: &[Piece]) -> Vec<(Vec<Piece>, Combo)> {
    let n = hand.len().min(16);
    let mut seen: BTreeSet<Vec<Piece>> = BTreeSet::new();
    let mut out = Vec::new();

    for mask in 1u32..(1u32 << n) {
        if mask.count_ones() as usize > MAX_PLAY_SIZE {
            continue;
        }
        let mut subset: Vec<Piece> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| hand[i])
            .collect();
        subset.sort();
        if seen.contains(&subset) {
            continue;
        }
        if let Some(combo) = evaluate(&subset) {
            seen.insert(subset.clone());
            out.push((subset, combo));
        }
    }

    out.sort_by(|(a, ca), (b, cb)| a.len().cmp(&b.len()).then(ca.value.cmp(&cb.value)));
    out
}
