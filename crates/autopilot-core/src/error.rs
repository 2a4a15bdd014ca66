use thiserror::Error;

use crate::hex::Hex;
use crate::ids::{CityId, CivId, UnitId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),
    #[error("unknown city {0}")]
    UnknownCity(CityId),
    #[error("unknown civilization {0:?}")]
    UnknownCiv(CivId),
    #[error("unknown unit kind {0:?}")]
    UnknownKind(String),
    #[error("tile {0} is outside the map")]
    OutOfBounds(Hex),
    #[error("tile {0} is already occupied")]
    Occupied(Hex),
    #[error("cannot found a city at {hex}: {reason}")]
    IllegalFounding { hex: Hex, reason: &'static str },
}
