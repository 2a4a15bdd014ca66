use autopilot_core::{Hex, Improvement, UnitId};
use tracing::{debug, trace};

use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;

const WANDER_STREAM: u64 = 0x5741_4e44;
const RING_STREAM: u64 = 0x5249_4e47;

/// Moves onto the cheapest ancient ruin in range. Returns whether it moved.
pub fn try_go_to_ruin(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<bool, AutomationError> {
    let unit = turn.unit;
    let range = turn.refresh(ctx).clone();
    let world = &*ctx.world;
    let ruin = range
        .iter()
        .filter(|(hex, _)| {
            world
                .tile(*hex)
                .is_some_and(|t| t.improvement == Some(Improvement::AncientRuins))
                && world.can_move_to(unit, *hex)
        })
        .min_by_key(|(hex, cost)| (*cost, *hex))
        .map(|(hex, _)| hex);
    let Some(ruin) = ruin else {
        return Ok(false);
    };
    debug!("unit {unit}: looting ruins at {ruin}");
    Ok(ctx.navigator().move_within_range(ctx.world, unit, &range, ruin)?)
}

/// Unexplored tiles the unit can end on and reach, `radius` rings at most.
fn unexplored_rings(ctx: &AutomationContext<'_>, unit: UnitId, radius: i32) -> Vec<Vec<Hex>> {
    let world = &*ctx.world;
    let Some(u) = world.unit(unit) else {
        return Vec::new();
    };
    let navigator = ctx.navigator();
    (1..=radius)
        .map(|r| {
            world
                .map()
                .tiles_at_distance(u.position, r)
                .into_iter()
                .filter(|hex| {
                    !world.has_explored(u.owner, *hex)
                        && world.can_move_to(unit, *hex)
                        && navigator.can_reach(world, unit, *hex)
                })
                .collect()
        })
        .collect()
}

/// Without anything to explore, wander to a random tile that spends the whole
/// turn, or any movable tile if none does.
fn wander(ctx: &mut AutomationContext<'_>, turn: &mut UnitTurn) -> Result<(), AutomationError> {
    let unit = turn.unit;
    let range = turn.refresh(ctx).clone();
    let world = &*ctx.world;
    let movable: Vec<Hex> = range
        .hexes()
        .filter(|hex| *hex != range.origin() && world.can_move_to(unit, *hex))
        .collect();
    let exhausting: Vec<Hex> = movable.iter().copied().filter(|h| range.exhausts(*h)).collect();
    let pool = if exhausting.is_empty() { &movable } else { &exhausting };

    let mut rng = ctx.turn.rng_for_unit(unit, WANDER_STREAM);
    let Some(target) = rng.choose(pool).copied() else {
        trace!("unit {unit}: nowhere to wander");
        return Ok(());
    };
    debug!("unit {unit}: wandering to {target}");
    ctx.navigator()
        .move_within_range(ctx.world, unit, &range, target)?;
    Ok(())
}

/// Loots ruins in range, then heads for the nearest unexplored tile within
/// `radius`, then wanders.
pub fn explore(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
    radius: i32,
) -> Result<(), AutomationError> {
    let unit = turn.unit;
    try_go_to_ruin(ctx, turn)?;
    if !turn.can_act(ctx.world) {
        return Ok(());
    }

    let target = unexplored_rings(ctx, unit, radius)
        .into_iter()
        .find_map(|ring| ring.first().copied());
    if let Some(target) = target {
        debug!("unit {unit}: exploring towards {target}");
        if ctx.navigator().head_towards(ctx.world, unit, target)?.is_some() {
            return Ok(());
        }
    }
    wander(ctx, turn)
}

/// Exploration for units the player set to explore on their own: loots ruins,
/// then heads for a random pick on the nearest unexplored ring.
pub fn automated_explore(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<(), AutomationError> {
    let unit = turn.unit;
    try_go_to_ruin(ctx, turn)?;
    if !turn.can_act(ctx.world) {
        return Ok(());
    }

    let nearest = unexplored_rings(ctx, unit, ctx.config.automated_explore_radius)
        .into_iter()
        .find(|ring| !ring.is_empty());
    if let Some(ring) = nearest {
        let mut rng = ctx.turn.rng_for_unit(unit, RING_STREAM);
        if let Some(target) = rng.choose(&ring).copied() {
            debug!("unit {unit}: auto-exploring towards {target}");
            if ctx.navigator().head_towards(ctx.world, unit, target)?.is_some() {
                return Ok(());
            }
        }
    }
    wander(ctx, turn)
}
