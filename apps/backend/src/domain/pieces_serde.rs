//! Serialization and deserialization for pieces (token form on the wire)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::pieces_types::Piece;

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Piece>()
            .map_err(|_| serde::de::Error::custom(format!("Invalid piece: {s}")))
    }
}
