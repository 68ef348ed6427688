#![allow(dead_code)]

pub mod rooms;

use liap_backend::domain::{try_parse_pieces, Piece};

pub fn pieces(tokens: &[&str]) -> Vec<Piece> {
    try_parse_pieces(tokens).expect("fixture tokens parse")
}

pub fn table(tokens: &[[&str; 8]; 4]) -> [Vec<Piece>; 4] {
    tokens.map(|hand| pieces(&hand))
}
