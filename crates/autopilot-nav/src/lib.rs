//! Movement range and route queries for automated units.

#![forbid(unsafe_code)]

pub mod hex_nav;
pub mod navigator;
pub mod range;

pub use hex_nav::{HexNavigator, ROAD_STEP_MILLI};
pub use navigator::Navigator;
pub use range::{from_milli, to_milli, MovementRange, MILLI_PER_MOVE};
