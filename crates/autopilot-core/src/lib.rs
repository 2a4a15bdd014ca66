//! World model for unit automation: hex map, rules, units, cities and civilizations.

#![forbid(unsafe_code)]

mod city;
mod civ;
mod context;
mod entities;
mod error;
mod hex;
mod ids;
mod map;
pub mod rng;
mod rules;
mod unit;
mod world;

pub use crate::city::*;
pub use crate::civ::*;
pub use crate::context::*;
pub use crate::entities::*;
pub use crate::error::*;
pub use crate::hex::*;
pub use crate::ids::*;
pub use crate::map::*;
pub use crate::rng::DeterministicRng;
pub use crate::rules::*;
pub use crate::unit::*;
pub use crate::world::*;
