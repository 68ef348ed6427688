//! Piece parsing from token form (e.g., "GENERAL_RED", "SOLDIER_BLACK")

use std::str::FromStr;

use super::pieces_types::{Piece, PieceColor, PieceName};
use crate::errors::domain::{DomainError, InvalidActionKind};

impl FromStr for PieceName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceName::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| {
                DomainError::invalid(
                    InvalidActionKind::MalformedPayload,
                    format!("Parse piece name: {s}"),
                )
            })
    }
}

impl FromStr for PieceColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RED" => Ok(PieceColor::Red),
            "BLACK" => Ok(PieceColor::Black),
            _ => Err(DomainError::invalid(
                InvalidActionKind::MalformedPayload,
                format!("Parse piece color: {s}"),
            )),
        }
    }
}

impl FromStr for Piece {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        let (name, color) = token.rsplit_once('_').ok_or_else(|| {
            DomainError::invalid(
                InvalidActionKind::MalformedPayload,
                format!("Parse piece: {s}"),
            )
        })?;
        Ok(Piece::new(name.parse()?, color.parse()?))
    }
}

/// Non-panicking helper to parse piece tokens into Piece instances.
pub fn try_parse_pieces<I, S>(tokens: I) -> Result<Vec<Piece>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Piece>())
        .collect()
}
