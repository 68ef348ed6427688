// Unit tests for error mapping - taxonomy, codes and fatality
use crate::errors::domain::{
    ConflictKind, DomainError, ErrorKind, InvalidActionKind, RoomErrorKind, RuleKind,
};
use crate::ErrorCode;

#[test]
fn maps_invalid_actions() {
    let err = DomainError::invalid(InvalidActionKind::OutOfTurn, "seat 2 is not up");
    assert_eq!(err.kind(), ErrorKind::InvalidAction);
    assert_eq!(err.code(), ErrorCode::OutOfTurn);
    assert!(!err.is_fatal());
    assert_eq!(err.detail(), "seat 2 is not up");
}

#[test]
fn maps_rule_violations() {
    let err = DomainError::rule(RuleKind::ForbiddenTotal, "sum would be 8");
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
    assert_eq!(err.code().as_str(), "FORBIDDEN_DECLARATION_TOTAL");

    let err = DomainError::rule(RuleKind::PieceNotInHand, "missing");
    assert_eq!(err.code().as_str(), "PIECE_NOT_IN_HAND");
}

#[test]
fn maps_conflicts() {
    let err = DomainError::conflict(ConflictKind::StaleVersion, "expected 3, at 4");
    assert_eq!(err.kind(), ErrorKind::Concurrency);
    assert_eq!(err.code().as_str(), "STALE_VERSION");
    assert!(!err.is_fatal());
}

#[test]
fn only_invariants_are_fatal() {
    let err = DomainError::invariant("piece count drifted");
    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    assert!(err.is_fatal());

    let room = DomainError::room(RoomErrorKind::Closed, "closed");
    assert!(!room.is_fatal());
    assert_eq!(room.code(), ErrorCode::RoomClosed);
}

#[test]
fn display_includes_detail() {
    let err = DomainError::rule(RuleKind::WrongPieceCount, "expected 2 pieces, got 3");
    assert!(err.to_string().contains("expected 2 pieces, got 3"));
}
