use std::collections::BTreeMap;

use autopilot_core::Hex;
pub use autopilot_core::{from_milli, to_milli, MILLI_PER_MOVE};

/// Cost to reach every tile a unit can get to this turn.
///
/// Costs are in milli-movement so slack comparisons are exact. The unit's own
/// tile is always present at cost 0. A tile whose cost equals the budget was
/// entered with whatever movement was left ("full expenditure").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRange {
    origin: Hex,
    budget_milli: u32,
    costs: BTreeMap<Hex, u32>,
}

impl MovementRange {
    pub fn new(origin: Hex, budget_milli: u32) -> Self {
        let mut costs = BTreeMap::new();
        costs.insert(origin, 0);
        Self {
            origin,
            budget_milli,
            costs,
        }
    }

    /// Builds a range from precomputed costs; entries above the budget are dropped.
    pub fn from_costs(
        origin: Hex,
        budget_milli: u32,
        costs: impl IntoIterator<Item = (Hex, u32)>,
    ) -> Self {
        let mut range = Self::new(origin, budget_milli);
        for (hex, cost) in costs {
            if cost <= budget_milli && hex != origin {
                range.costs.insert(hex, cost);
            }
        }
        range
    }

    pub(crate) fn insert(&mut self, hex: Hex, cost_milli: u32) {
        self.costs.insert(hex, cost_milli);
    }

    pub fn origin(&self) -> Hex {
        self.origin
    }

    pub fn budget_milli(&self) -> u32 {
        self.budget_milli
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.costs.contains_key(&hex)
    }

    pub fn cost_milli(&self, hex: Hex) -> Option<u32> {
        self.costs.get(&hex).copied()
    }

    pub fn cost(&self, hex: Hex) -> Option<f32> {
        self.cost_milli(hex).map(from_milli)
    }

    /// Movement left after reaching `hex`.
    pub fn slack_milli(&self, hex: Hex) -> Option<u32> {
        self.cost_milli(hex)
            .map(|c| self.budget_milli.saturating_sub(c))
    }

    pub fn exhausts(&self, hex: Hex) -> bool {
        self.slack_milli(hex) == Some(0)
    }

    /// Entries in ascending hex order.
    pub fn iter(&self) -> impl Iterator<Item = (Hex, u32)> + '_ {
        self.costs.iter().map(|(h, c)| (*h, *c))
    }

    pub fn hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        self.costs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// True when nothing besides the origin is in range.
    pub fn is_empty(&self) -> bool {
        self.costs.len() <= 1
    }
}
