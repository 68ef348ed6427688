//! Core piece types: Piece, PieceName, PieceColor

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PieceColor {
    Black,
    Red,
}

/// Piece names, ordered weakest first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PieceName {
    Soldier,
    Cannon,
    Horse,
    Chariot,
    Elephant,
    Advisor,
    General,
}

impl PieceName {
    pub const ALL: [PieceName; 7] = [
        PieceName::Soldier,
        PieceName::Cannon,
        PieceName::Horse,
        PieceName::Chariot,
        PieceName::Elephant,
        PieceName::Advisor,
        PieceName::General,
    ];

    /// Copies of this name per color in a full set.
    pub const fn copies_per_color(self) -> usize {
        match self {
            PieceName::General => 1,
            PieceName::Soldier => 5,
            _ => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PieceName::Soldier => "SOLDIER",
            PieceName::Cannon => "CANNON",
            PieceName::Horse => "HORSE",
            PieceName::Chariot => "CHARIOT",
            PieceName::Elephant => "ELEPHANT",
            PieceName::Advisor => "ADVISOR",
            PieceName::General => "GENERAL",
        }
    }
}

impl PieceColor {
    pub const fn as_str(self) -> &'static str {
        match self {
            PieceColor::Red => "RED",
            PieceColor::Black => "BLACK",
        }
    }
}

/// One tile. Value type: two pieces with the same name and color are
/// interchangeable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub name: PieceName,
    pub color: PieceColor,
}

impl Piece {
    pub const fn new(name: PieceName, color: PieceColor) -> Self {
        Self { name, color }
    }

    /// Fixed strength: 14 for GENERAL_RED down to 1 for SOLDIER_BLACK.
    /// Red outranks black at equal name.
    pub const fn strength(&self) -> u8 {
        let base = match self.name {
            PieceName::General => 13,
            PieceName::Advisor => 11,
            PieceName::Elephant => 9,
            PieceName::Chariot => 7,
            PieceName::Horse => 5,
            PieceName::Cannon => 3,
            PieceName::Soldier => 1,
        };
        match self.color {
            PieceColor::Red => base + 1,
            PieceColor::Black => base,
        }
    }
}

// Ordering is by strength; each (name, color) has a distinct strength so this
// is a total order consistent with Eq.
impl Ord for Piece {
    fn cmp(&self, other: &Self) -> Ordering {
        self.strength().cmp(&other.strength())
    }
}

impl PartialOrd for Piece {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name.as_str(), self.color.as_str())
    }
}

/// Full 32-piece set in strength order (weakest first).
pub fn full_set() -> Vec<Piece> {
    let mut set = Vec::with_capacity(32);
    for name in PieceName::ALL {
        for color in [PieceColor::Black, PieceColor::Red] {
            for _ in 0..name.copies_per_color() {
                set.push(Piece::new(name, color));
            }
        }
    }
    set
}
