//! Upgrades, settler escorts and work boats.

use autopilot_core::{Hex, UnitRole};
use tracing::{debug, trace};

use crate::actions::{try_action, CREATE_FISHING_BOATS, UPGRADE_PREFIX};
use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::planners::exploration::explore;
use crate::policy::Outcome;

/// Upgrades the unit when its successor is researched and the treasury holds
/// strictly more than the price.
pub fn try_upgrade(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let (Some(u), Some(kind)) = (world.unit(unit), world.unit_kind(unit)) else {
        return Ok(Outcome::NotApplicable);
    };
    let Some(target) = kind.upgrades_to.map(|id| world.rules().unit_kind(id)) else {
        return Ok(Outcome::NotApplicable);
    };
    let Some(civ) = world.civ(u.owner) else {
        return Ok(Outcome::NotApplicable);
    };
    let researched = target.required_tech.as_ref().is_none_or(|t| civ.has_tech(t));
    let cost = ctx.config.upgrade_cost(kind, target);
    if !researched || civ.gold <= cost {
        trace!("unit {unit}: cannot upgrade to {} yet", target.name);
        return Ok(Outcome::NotApplicable);
    }

    let name = format!("{UPGRADE_PREFIX}{}", target.name);
    let upgraded = try_action(ctx.actions(), ctx.world, unit, &|action| action == name)?;
    Ok(if upgraded {
        Outcome::Handled
    } else {
        Outcome::NotApplicable
    })
}

/// Walks towards the first friendly founder without a military unit on its tile.
pub fn try_accompany_settler(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let Some(owner) = world.unit(unit).map(|u| u.owner) else {
        return Ok(Outcome::NotApplicable);
    };
    let navigator = ctx.navigator();
    let founder = world
        .units_of(owner)
        .into_iter()
        .filter(|id| world.unit_kind(*id).is_some_and(|k| k.role() == UnitRole::Founder))
        .filter_map(|id| world.unit(id).map(|u| u.position))
        .find(|hex| {
            world.tile(*hex).is_some_and(|t| t.military_unit.is_none())
                && world.can_move_to(unit, *hex)
                && navigator.can_reach(world, unit, *hex)
        });
    let Some(target) = founder else {
        return Ok(Outcome::NotApplicable);
    };
    debug!("unit {unit}: escorting founder at {target}");
    navigator.head_towards(ctx.world, unit, target)?;
    Ok(Outcome::Handled)
}

/// Sends a work boat to the nearest visible, unimproved sea resource near an
/// own city and improves it on arrival. Explores when there is none.
pub fn automate_work_boats(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<(), AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let Some(boat) = world.unit(unit) else {
        return Ok(());
    };
    let (owner, position) = (boat.owner, boat.position);
    let navigator = ctx.navigator();

    let visible = world.viewable_tiles(owner);
    let mut targets: Vec<Hex> = world
        .cities_of(owner)
        .into_iter()
        .filter_map(|id| world.city(id))
        .flat_map(|city| {
            world
                .map()
                .tiles_in_distance(city.position, ctx.config.work_boat_radius)
        })
        .filter(|hex| {
            visible.contains(hex)
                && world.tile(*hex).is_some_and(|t| {
                    t.resource.is_some_and(|r| world.rules().resource(r).water)
                        && t.improvement.is_none()
                        && t.owner.is_none_or(|o| o == owner)
                })
        })
        .collect();
    targets.sort_by_key(|hex| (hex.distance(position), *hex));
    targets.dedup();

    let target = targets.into_iter().find(|hex| {
        (*hex == position || world.can_move_to(unit, *hex)) && navigator.can_reach(world, unit, *hex)
    });
    let Some(target) = target else {
        trace!("unit {unit}: no sea resource to improve");
        let radius = ctx.config.explore_radius;
        return explore(ctx, turn, radius);
    };

    if target != position {
        debug!("unit {unit}: heading to sea resource at {target}");
        navigator.head_towards(ctx.world, unit, target)?;
    }
    let arrived = ctx
        .world
        .unit(unit)
        .is_some_and(|u| u.position == target && u.has_movement_left());
    if arrived {
        try_action(ctx.actions(), ctx.world, unit, &|name| name == CREATE_FISHING_BOATS)?;
    }
    Ok(())
}
