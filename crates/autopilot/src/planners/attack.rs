use autopilot_core::{Hex, UnitId, World, UNIQUE_INDIRECT_FIRE, UNIQUE_MUST_SET_UP};
use autopilot_nav::MovementRange;
use tracing::{debug, trace};

use crate::actions::{try_action, SET_UP};
use crate::combat::{CombatResolver, Combatant};
use crate::context::{AutomationContext, UnitTurn};
use crate::error::AutomationError;
use crate::policy::Outcome;

/// Where the unit would attack from, and what it would hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackableTile {
    pub from: Hex,
    pub to: Hex,
    /// Movement spent reaching `from`, in milli.
    pub from_cost_milli: u32,
}

/// Whether `hex` holds something of a civilization at war with the unit's owner
/// that the unit is allowed to attack.
pub fn contains_attackable_enemy(world: &World, hex: Hex, unit: UnitId) -> bool {
    let (Some(attacker), Some(kind)) = (world.unit(unit), world.unit_kind(unit)) else {
        return false;
    };
    let Some(owner) = world.combatant_at(hex).and_then(|o| world.occupant_owner(o)) else {
        return false;
    };
    if owner == attacker.owner || !world.is_at_war(attacker.owner, owner) {
        return false;
    }
    if world.is_embarked(unit) && (kind.is_ranged() || world.is_water(hex)) {
        return false;
    }
    true
}

/// Every (from, to) pair the unit could still attack this turn.
///
/// A from-tile qualifies only while strictly more than `slack_milli` movement
/// would remain after reaching it. Targets must be in sight of the owner.
pub fn attackable_enemies(
    world: &World,
    unit: UnitId,
    range: &MovementRange,
    slack_milli: u32,
) -> Vec<AttackableTile> {
    let (Some(attacker), Some(kind)) = (world.unit(unit), world.unit_kind(unit)) else {
        return Vec::new();
    };
    let indirect = kind.has_unique(UNIQUE_INDIRECT_FIRE);
    let visible = world.viewable_tiles(attacker.owner);
    let mut out = Vec::new();
    for (from, cost) in range.iter() {
        if from != attacker.position && !world.can_move_to(unit, from) {
            continue;
        }
        if range.budget_milli().saturating_sub(cost) <= slack_milli {
            continue;
        }
        let in_reach = if indirect {
            world.map().tiles_in_distance(from, kind.range)
        } else {
            world.viewable_from(from, kind.range)
        };
        out.extend(
            in_reach
                .into_iter()
                .filter(|to| {
                    *to != from
                        && visible.contains(to)
                        && contains_attackable_enemy(world, *to, unit)
                })
                .map(|to| AttackableTile {
                    from,
                    to,
                    from_cost_milli: cost,
                }),
        );
    }
    out
}

/// Picks the attack to make, if any is safe.
///
/// Attacks the unit would not survive are dropped. A melee unit takes a
/// capturable city first; otherwise the weakest enemy unit; otherwise the
/// weakest city that can still be damaged.
pub fn choose_attack(
    world: &World,
    unit: UnitId,
    attacks: &[AttackableTile],
    resolver: &dyn CombatResolver,
) -> Option<AttackableTile> {
    let attacker = Combatant::Unit(unit);
    let health = attacker.health(world);
    let survivable = attacks
        .iter()
        .filter_map(|a| {
            let defender = Combatant::from(world.combatant_at(a.to)?);
            (resolver.expected_damage_to_attacker(world, attacker, defender) < health)
                .then_some((*a, defender))
        })
        .collect::<Vec<_>>();

    let tie_break = |a: &AttackableTile| (a.from_cost_milli, a.to, a.from);
    let weakest = |wanted: &dyn Fn(Combatant) -> bool| {
        survivable
            .iter()
            .filter(|(_, d)| wanted(*d))
            .min_by_key(|(a, d)| (d.health(world), tie_break(a)))
            .map(|(a, _)| *a)
    };

    if attacker.is_melee(world) {
        if let Some(capture) = weakest(&|d| d.is_capturable_city(world)) {
            return Some(capture);
        }
    }
    weakest(&|d| !d.is_city()).or_else(|| weakest(&|d| d.is_city() && !d.is_capturable_city(world)))
}

pub fn try_attack(
    ctx: &mut AutomationContext<'_>,
    turn: &mut UnitTurn,
) -> Result<Outcome, AutomationError> {
    let unit = turn.unit;
    let range = turn.refresh(ctx);
    let attacks = attackable_enemies(ctx.world, unit, range, ctx.config.attack_slack_milli());
    let Some(attack) = choose_attack(ctx.world, unit, &attacks, ctx.services.combat.as_ref())
    else {
        trace!("unit {unit}: nothing safe to attack");
        return Ok(Outcome::NotApplicable);
    };

    let range = range.clone();
    if attack.from != range.origin() {
        ctx.navigator()
            .move_within_range(ctx.world, unit, &range, attack.from)?;
    }

    let must_set_up = ctx
        .world
        .unit_kind(unit)
        .is_some_and(|k| k.has_unique(UNIQUE_MUST_SET_UP));
    if must_set_up {
        try_action(ctx.actions(), ctx.world, unit, &|name| name == SET_UP)?;
    }

    if turn.can_act(ctx.world) {
        if let Some(defender) = ctx.world.combatant_at(attack.to) {
            debug!("unit {unit}: attacking {} from {}", attack.to, attack.from);
            ctx.services
                .combat
                .attack(ctx.world, Combatant::Unit(unit), defender.into())?;
        }
    }
    Ok(Outcome::Handled)
}
