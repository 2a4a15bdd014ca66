use autopilot_core::{CityId, Hex, UnitId, World};
use tracing::{debug, trace};

use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::policy::Outcome;

/// In wartime a city needs defending when it is damaged or an enemy city is close.
fn needs_defending(world: &World, city: CityId, unit: UnitId, threat_radius: i32) -> bool {
    let (Some(city), Some(owner)) = (world.city(city), world.unit(unit).map(|u| u.owner)) else {
        return false;
    };
    if city.is_damaged() {
        return true;
    }
    world.cities().any(|(_, other)| {
        world.is_at_war(owner, other.owner) && other.position.distance(city.position) <= threat_radius
    })
}

pub fn try_garrison(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let (Some(u), Some(kind)) = (world.unit(unit), world.unit_kind(unit)) else {
        return Ok(Outcome::NotApplicable);
    };
    if kind.is_melee() {
        return Ok(Outcome::NotApplicable);
    }
    let owner = u.owner;
    let here = u.position;
    let navigator = ctx.navigator();

    // Own city centers with no military unit.
    let candidates: Vec<(CityId, Hex)> = world
        .cities_of(owner)
        .into_iter()
        .filter_map(|id| world.city(id).map(|c| (id, c.position)))
        .filter(|(_, hex)| {
            world.tile(*hex).is_some_and(|t| t.military_unit.is_none())
                && world.can_move_to(unit, *hex)
        })
        .collect();
    let current_city = world.city_at(here).filter(|c| world.city(*c).is_some_and(|c| c.owner == owner));

    let target = if !world.diplomacy().any_war(owner) {
        if current_city.is_some() {
            trace!("unit {unit}: holding city at {here}");
            return Ok(Outcome::Handled);
        }
        let mut nearest = candidates;
        nearest.sort_by_key(|(id, hex)| (hex.distance(here), *id));
        nearest
            .into_iter()
            .map(|(_, hex)| hex)
            .find(|hex| navigator.can_reach(world, unit, *hex))
    } else {
        let radius = ctx.config.garrison_threat_radius;
        if current_city.is_some_and(|c| needs_defending(world, c, unit, radius)) {
            trace!("unit {unit}: defending city at {here}");
            return Ok(Outcome::Handled);
        }
        candidates
            .iter()
            .filter(|(id, _)| needs_defending(world, *id, unit, radius))
            .filter_map(|(_, hex)| {
                let path = navigator.shortest_path(world, unit, *hex);
                (!path.is_empty()).then_some((path.len(), *hex))
            })
            .min_by_key(|(len, _)| *len)
            .map(|(_, hex)| hex)
    };

    let Some(target) = target else {
        return Ok(Outcome::NotApplicable);
    };
    debug!("unit {unit}: moving to garrison {target}");
    navigator.head_towards(ctx.world, unit, target)?;
    Ok(Outcome::Handled)
}
