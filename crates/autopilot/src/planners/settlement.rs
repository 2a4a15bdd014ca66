use std::collections::BTreeSet;

use autopilot_core::{Hex, UnitId, World};
use tracing::{debug, error, trace};

use crate::actions::{try_action, FOUND_CITY};
use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::planners::exploration::explore;
use crate::ranker::{rank_tile_as_city_center, rank_tiles_around};

/// Whether a military unit of the same civilization shares the founder's tile.
pub fn has_escort(world: &World, founder: UnitId) -> bool {
    let Some(unit) = world.unit(founder) else {
        return false;
    };
    world
        .tile(unit.position)
        .and_then(|t| t.military_unit)
        .and_then(|m| world.unit(m).zip(world.unit_kind(m)))
        .is_some_and(|(m, kind)| m.owner == unit.owner && kind.is_military())
}

/// Reachable city sites around the founder, best first.
pub fn rank_city_sites(ctx: &AutomationContext<'_>, founder: UnitId) -> Vec<(Hex, f32)> {
    let world = &*ctx.world;
    let config = ctx.config;
    let Some(unit) = world.unit(founder) else {
        return Vec::new();
    };
    let navigator = ctx.navigator();

    let excluded: BTreeSet<Hex> = world
        .cities()
        .flat_map(|(_, c)| {
            world
                .map()
                .tiles_in_distance(c.position, config.city_exclusion_radius)
        })
        .collect();
    let rankings = rank_tiles_around(
        world,
        ctx.services.valuer.as_ref(),
        unit.position,
        config.site_ranking_radius,
        unit.owner,
    );

    let mut sites: Vec<(Hex, f32)> = world
        .map()
        .tiles_in_distance(unit.position, config.site_candidate_radius)
        .into_iter()
        .filter(|hex| !excluded.contains(hex) && !world.is_water(*hex))
        .filter(|hex| {
            *hex == unit.position
                || (world.can_move_to(founder, *hex) && navigator.can_reach(world, founder, *hex))
        })
        .map(|hex| (hex, rank_tile_as_city_center(world, hex, &rankings, config)))
        .collect();
    // Stable: equal scores keep spiral order.
    sites.sort_by(|a, b| b.1.total_cmp(&a.1));
    sites
}

/// Drives an escorted founder to the best site nearby and founds a city there.
pub fn automate_settler(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<(), AutomationError> {
    let founder = turn.unit;
    if !has_escort(ctx.world, founder) {
        trace!("unit {founder}: waiting for an escort");
        return Ok(());
    }

    let Some((site, score)) = rank_city_sites(ctx, founder).into_iter().next() else {
        debug!("unit {founder}: no reachable city site, exploring");
        let radius = ctx.config.explore_radius;
        return explore(ctx, turn, radius);
    };
    if ctx.world.city_within(site, ctx.config.city_exclusion_radius) {
        error!("unit {founder}: chosen site {site} is too close to a city");
        return Err(AutomationError::InvariantViolation(format!(
            "city site {site} lies within {} of an existing city",
            ctx.config.city_exclusion_radius
        )));
    }

    let Some(position) = ctx.world.unit(founder).map(|u| u.position) else {
        return Ok(());
    };
    if position != site {
        debug!("unit {founder}: heading to city site {site} (score {score})");
        ctx.navigator().head_towards(ctx.world, founder, site)?;
    }

    let arrived = ctx
        .world
        .unit(founder)
        .is_some_and(|u| u.position == site && u.has_movement_left());
    if arrived {
        try_action(ctx.actions(), ctx.world, founder, &|name| name == FOUND_CITY)?;
    }
    Ok(())
}
