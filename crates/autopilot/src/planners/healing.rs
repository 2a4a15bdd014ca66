use std::cmp::Reverse;

use autopilot_core::{Hex, UNIQUE_NO_DEFENSIVE_TERRAIN_BONUS};
use tracing::debug;

use crate::actions::{try_action, FORTIFY_PREFIX};
use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::ranker::healing_rank;

/// Best tile in range to heal on: highest rank, then highest defensive bonus,
/// then lowest hex.
pub fn best_healing_tile(ctx: &AutomationContext<'_>, turn: &mut UnitTurn) -> Option<Hex> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let origin = world.unit(unit)?.position;
    let range = turn.refresh(ctx);
    range
        .hexes()
        .filter(|hex| *hex == origin || world.can_move_to(unit, *hex))
        .min_by_key(|hex| {
            let defense = world.terrain_at(*hex).map_or(0, |t| t.defense_bonus);
            (Reverse(healing_rank(world, unit, *hex)), Reverse(defense))
        })
}

/// Moves to a better healing tile if one is in range, then fortifies.
pub fn heal_unit(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<(), AutomationError> {
    let unit = turn.unit;
    let Some(origin) = ctx.world.unit(unit).map(|u| u.position) else {
        return Ok(());
    };
    if let Some(best) = best_healing_tile(ctx, turn) {
        let better = healing_rank(ctx.world, unit, best) > healing_rank(ctx.world, unit, origin);
        if best != origin && better {
            debug!("unit {unit}: retreating to {best} to heal");
            let range = turn.refresh(ctx).clone();
            ctx.navigator()
                .move_within_range(ctx.world, unit, &range, best)?;
        }
    }

    let Some(current) = ctx.world.unit(unit) else {
        return Ok(());
    };
    let no_terrain_bonus = ctx
        .world
        .unit_kind(unit)
        .is_some_and(|k| k.has_unique(UNIQUE_NO_DEFENSIVE_TERRAIN_BONUS));
    if current.has_movement_left() && !no_terrain_bonus && !current.is_fortified() {
        try_action(ctx.actions(), ctx.world, unit, &|name| {
            name.starts_with(FORTIFY_PREFIX)
        })?;
    }
    Ok(())
}
