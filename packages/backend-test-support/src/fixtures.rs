//! Piece token fixtures. Tokens use the wire form (`NAME_COLOR`) so they
//! can be parsed by whichever crate consumes them.

/// Full-set partition where seats 1 and 3 hold weak hands and seat 0 holds
/// GENERAL_RED.
pub const WEAK_TABLE: [[&str; 8]; 4] = [
    [
        "GENERAL_RED",
        "GENERAL_BLACK",
        "ADVISOR_RED",
        "ADVISOR_RED",
        "ADVISOR_BLACK",
        "ADVISOR_BLACK",
        "CHARIOT_RED",
        "CHARIOT_RED",
    ],
    [
        "ELEPHANT_BLACK",
        "ELEPHANT_BLACK",
        "HORSE_BLACK",
        "HORSE_BLACK",
        "CANNON_BLACK",
        "CANNON_BLACK",
        "SOLDIER_BLACK",
        "SOLDIER_BLACK",
    ],
    [
        "ELEPHANT_RED",
        "ELEPHANT_RED",
        "CHARIOT_BLACK",
        "CHARIOT_BLACK",
        "HORSE_RED",
        "HORSE_RED",
        "CANNON_RED",
        "CANNON_RED",
    ],
    [
        "SOLDIER_RED",
        "SOLDIER_RED",
        "SOLDIER_RED",
        "SOLDIER_RED",
        "SOLDIER_RED",
        "SOLDIER_BLACK",
        "SOLDIER_BLACK",
        "SOLDIER_BLACK",
    ],
];

/// Full-set partition with no weak hand: every seat holds a piece above
/// ELEPHANT_BLACK.
pub const STRONG_TABLE: [[&str; 8]; 4] = [
    [
        "GENERAL_RED",
        "ADVISOR_RED",
        "SOLDIER_RED",
        "SOLDIER_RED",
        "SOLDIER_BLACK",
        "SOLDIER_BLACK",
        "CANNON_BLACK",
        "HORSE_BLACK",
    ],
    [
        "GENERAL_BLACK",
        "ADVISOR_RED",
        "SOLDIER_RED",
        "SOLDIER_BLACK",
        "CANNON_RED",
        "CANNON_BLACK",
        "HORSE_BLACK",
        "CHARIOT_BLACK",
    ],
    [
        "ADVISOR_BLACK",
        "ELEPHANT_RED",
        "SOLDIER_RED",
        "SOLDIER_BLACK",
        "CANNON_RED",
        "HORSE_RED",
        "CHARIOT_BLACK",
        "ELEPHANT_BLACK",
    ],
    [
        "ADVISOR_BLACK",
        "ELEPHANT_RED",
        "SOLDIER_RED",
        "SOLDIER_BLACK",
        "HORSE_RED",
        "CHARIOT_RED",
        "CHARIOT_RED",
        "ELEPHANT_BLACK",
    ],
];
