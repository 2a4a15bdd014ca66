use serde::{Deserialize, Serialize};

use crate::hex::Hex;
use crate::ids::{CivId, UnitKindId};
use crate::rules::Ruleset;

pub const MAX_UNIT_HEALTH: i32 = 100;

/// Fixed-point scale: one movement point is 1000 milli.
pub const MILLI_PER_MOVE: u32 = 1000;

pub fn to_milli(movement: f32) -> u32 {
    (movement.max(0.0) * MILLI_PER_MOVE as f32).round() as u32
}

pub fn from_milli(milli: u32) -> f32 {
    milli as f32 / MILLI_PER_MOVE as f32
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKindId,
    pub owner: CivId,
    pub position: Hex,
    /// 0..=100; the unit is removed from the world at 0.
    pub health: i32,
    /// Remaining movement points this turn, never negative.
    pub movement: f32,
    /// Fortification level, `None` when not fortified.
    pub fortification: Option<u8>,
    pub set_up: bool,
    pub automated: bool,
}

impl Unit {
    pub fn new(kind: UnitKindId, owner: CivId, position: Hex, rules: &Ruleset) -> Self {
        Self {
            kind,
            owner,
            position,
            health: MAX_UNIT_HEALTH,
            movement: rules.unit_kind(kind).movement as f32,
            fortification: None,
            set_up: false,
            automated: true,
        }
    }

    pub fn max_movement(&self, rules: &Ruleset) -> f32 {
        rules.unit_kind(self.kind).movement as f32
    }

    /// Less than one milli left counts as spent.
    pub fn has_movement_left(&self) -> bool {
        to_milli(self.movement) > 0
    }

    pub fn is_fortified(&self) -> bool {
        self.fortification.is_some()
    }

    /// Leaves any stance that requires staying put.
    pub fn break_stance(&mut self) {
        self.fortification = None;
        self.set_up = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::embedded_rules;

    #[test]
    fn movement_below_one_milli_counts_as_spent() {
        let rules = embedded_rules().expect("rules load");
        let warrior = rules.unit_kind_id("warrior").expect("warrior");
        let mut unit = Unit::new(warrior, CivId(0), Hex::new(0, 0), &rules);
        assert_eq!(to_milli(unit.max_movement(&rules)), 2000);
        assert!(unit.has_movement_left());

        unit.movement = 0.0004;
        assert!(!unit.has_movement_left());
        unit.movement = 0.001;
        assert!(unit.has_movement_left());
    }

    #[test]
    fn conversion_rounds_to_nearest_milli() {
        assert_eq!(to_milli(1.9), 1900);
        assert_eq!(to_milli(-1.0), 0);
        assert_eq!(from_milli(1500), 1.5);
    }
}
