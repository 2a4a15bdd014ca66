use crate::ids::{EntityKey, UnitId};
use crate::rng::{derive_seed, DeterministicRng};

/// Per-turn inputs shared by every decision made during that turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    pub turn: u32,
    pub seed: u64,
}

impl TurnContext {
    pub fn new(turn: u32, seed: u64) -> Self {
        Self { turn, seed }
    }

    pub fn rng_for_unit(&self, unit: UnitId, stream: u64) -> DeterministicRng {
        let turn_seed = self.seed ^ u64::from(self.turn).rotate_left(32);
        DeterministicRng::new(derive_seed(turn_seed, unit.to_raw(), stream))
    }
}
