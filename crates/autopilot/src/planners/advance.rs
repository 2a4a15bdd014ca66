use autopilot_core::{CityId, Hex};
use tracing::debug;

use crate::combat::Combatant;
use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::planners::attack::contains_attackable_enemy;
use crate::policy::Outcome;

/// Heads for the closest reachable tile holding an attackable enemy.
///
/// Ranged units leave capturable cities to melee units.
pub fn try_advance_towards_close_enemy(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let Some(position) = world.unit(unit).map(|u| u.position) else {
        return Ok(Outcome::NotApplicable);
    };
    let ranged = Combatant::Unit(unit).is_ranged(world);
    let navigator = ctx.navigator();

    let target = world
        .map()
        .tiles_in_distance(position, ctx.config.enemy_advance_radius)
        .into_iter()
        .filter(|hex| *hex != position && contains_attackable_enemy(world, *hex, unit))
        .filter(|hex| {
            !ranged
                || !world
                    .combatant_at(*hex)
                    .is_some_and(|o| Combatant::from(o).is_capturable_city(world))
        })
        .find(|hex| navigator.can_reach(world, unit, *hex));
    let Some(target) = target else {
        return Ok(Outcome::NotApplicable);
    };
    debug!("unit {unit}: advancing on enemy at {target}");
    navigator.head_towards(ctx.world, unit, target)?;
    Ok(Outcome::Handled)
}

/// Marches on the known enemy city closest to one of the civilization's own cities.
pub fn try_head_towards_enemy_city(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let world = &*ctx.world;
    let Some(owner) = world.unit(unit).map(|u| u.owner) else {
        return Ok(Outcome::NotApplicable);
    };
    let own: Vec<Hex> = world
        .cities_of(owner)
        .into_iter()
        .filter_map(|id| world.city(id).map(|c| c.position))
        .collect();
    if own.is_empty() {
        return Ok(Outcome::NotApplicable);
    }
    let ranged = Combatant::Unit(unit).is_ranged(world);
    let navigator = ctx.navigator();

    let mut enemy: Vec<(i32, CityId, Hex)> = world
        .cities()
        .filter(|(_, c)| world.is_at_war(owner, c.owner) && world.has_explored(owner, c.position))
        .filter(|(_, c)| !(ranged && c.is_capturable()))
        .map(|(id, c)| {
            let closest = own
                .iter()
                .map(|hex| hex.distance(c.position))
                .min()
                .unwrap_or(i32::MAX);
            (closest, id, c.position)
        })
        .collect();
    enemy.sort();

    let target = enemy
        .into_iter()
        .map(|(_, _, hex)| hex)
        .find(|hex| navigator.can_reach(world, unit, *hex));
    let Some(target) = target else {
        return Ok(Outcome::NotApplicable);
    };
    debug!("unit {unit}: marching on enemy city at {target}");
    navigator.head_towards(ctx.world, unit, target)?;
    Ok(Outcome::Handled)
}
