use autopilot_core::{Hex, UnitId, World, WorldError};
use tracing::trace;

use crate::MovementRange;

/// Reachability and route queries for a single unit.
///
/// "Unreachable" is an ordinary answer: an empty path or a `false`, never an error.
pub trait Navigator {
    /// Every tile the unit can enter with its remaining movement this turn.
    fn movement_range(&self, world: &World, unit: UnitId) -> MovementRange;

    /// Tiles from the unit's position (exclusive) to `to` (inclusive) along the
    /// cheapest route. Empty when unreachable or when already there.
    fn shortest_path(&self, world: &World, unit: UnitId, to: Hex) -> Vec<Hex>;

    fn can_reach(&self, world: &World, unit: UnitId, to: Hex) -> bool {
        match world.unit(unit) {
            Some(u) if u.position == to => true,
            Some(_) => !self.shortest_path(world, unit, to).is_empty(),
            None => false,
        }
    }

    /// Advances along the route to `to` as far as this turn's movement allows,
    /// stopping on the farthest tile the unit may end on.
    ///
    /// Returns the tile moved to; `None` when unreachable or no progress is possible.
    fn head_towards(
        &self,
        world: &mut World,
        unit: UnitId,
        to: Hex,
    ) -> Result<Option<Hex>, WorldError> {
        let path = self.shortest_path(world, unit, to);
        if path.is_empty() {
            trace!("unit {unit} has no route to {to}");
            return Ok(None);
        }
        let range = self.movement_range(world, unit);
        let stop = path
            .iter()
            .rev()
            .copied()
            .find(|hex| range.contains(*hex) && world.can_move_to(unit, *hex));
        let Some(stop) = stop else {
            return Ok(None);
        };
        let cost = range.cost(stop).unwrap_or(0.0);
        world.move_unit(unit, stop, cost)?;
        Ok(Some(stop))
    }

    /// Moves straight to a tile already known to be in range.
    fn move_within_range(
        &self,
        world: &mut World,
        unit: UnitId,
        range: &MovementRange,
        to: Hex,
    ) -> Result<bool, WorldError> {
        let Some(cost) = range.cost(to) else {
            return Ok(false);
        };
        if !world.can_move_to(unit, to) {
            return Ok(false);
        }
        world.move_unit(unit, to, cost)?;
        Ok(true)
    }
}
