use autopilot_core::{
    CityId, CivId, Hex, Occupant, UnitId, World, WorldError, UNIQUE_NO_DEFENSIVE_TERRAIN_BONUS,
};
use tracing::debug;

/// Base damage of an even fight between full-health combatants.
const BASE_DAMAGE: f32 = 30.0;
/// Damage dealt to a combatant with no defending strength.
const OVERWHELMING_DAMAGE: i32 = 100;
const FORTIFICATION_BONUS_PERCENT: i32 = 25;

/// Anything that can fight: a unit or a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Combatant {
    Unit(UnitId),
    City(CityId),
}

impl From<Occupant> for Combatant {
    fn from(occupant: Occupant) -> Self {
        match occupant {
            Occupant::Unit(id) => Combatant::Unit(id),
            Occupant::City(id) => Combatant::City(id),
        }
    }
}

impl Combatant {
    /// Health, or 0 once removed from the world.
    pub fn health(self, world: &World) -> i32 {
        match self {
            Combatant::Unit(id) => world.unit(id).map_or(0, |u| u.health),
            Combatant::City(id) => world.city(id).map_or(0, |c| c.health),
        }
    }

    pub fn civ(self, world: &World) -> Option<CivId> {
        match self {
            Combatant::Unit(id) => world.unit(id).map(|u| u.owner),
            Combatant::City(id) => world.city(id).map(|c| c.owner),
        }
    }

    pub fn position(self, world: &World) -> Option<Hex> {
        match self {
            Combatant::Unit(id) => world.unit(id).map(|u| u.position),
            Combatant::City(id) => world.city(id).map(|c| c.position),
        }
    }

    pub fn is_defeated(self, world: &World) -> bool {
        self.health(world) <= 0
    }

    pub fn is_city(self) -> bool {
        matches!(self, Combatant::City(_))
    }

    pub fn is_capturable_city(self, world: &World) -> bool {
        match self {
            Combatant::City(id) => world.city(id).is_some_and(|c| c.is_capturable()),
            Combatant::Unit(_) => false,
        }
    }

    pub fn is_ranged(self, world: &World) -> bool {
        match self {
            Combatant::Unit(id) => world.unit_kind(id).is_some_and(|k| k.is_ranged()),
            Combatant::City(_) => false,
        }
    }

    pub fn is_melee(self, world: &World) -> bool {
        match self {
            Combatant::Unit(id) => world.unit_kind(id).is_some_and(|k| k.is_melee()),
            Combatant::City(_) => false,
        }
    }

    /// Ranged units attack with their ranged strength.
    pub fn attacking_strength(self, world: &World) -> i32 {
        match self {
            Combatant::Unit(id) => world.unit_kind(id).map_or(0, |k| {
                if k.is_ranged() {
                    k.ranged_strength
                } else {
                    k.strength
                }
            }),
            Combatant::City(id) => world.city(id).map_or(0, |c| c.strength),
        }
    }

    /// Embarked units defend at zero.
    pub fn defending_strength(self, world: &World) -> i32 {
        match self {
            Combatant::City(id) => world.city(id).map_or(0, |c| c.strength),
            Combatant::Unit(id) => {
                let (Some(unit), Some(kind)) = (world.unit(id), world.unit_kind(id)) else {
                    return 0;
                };
                if world.is_embarked(id) {
                    return 0;
                }
                let mut percent = 100;
                if !kind.has_unique(UNIQUE_NO_DEFENSIVE_TERRAIN_BONUS) {
                    percent += world.terrain_at(unit.position).map_or(0, |t| t.defense_bonus);
                }
                if let Some(level) = unit.fortification {
                    percent += FORTIFICATION_BONUS_PERCENT * i32::from(level);
                }
                kind.strength * percent / 100
            }
        }
    }

    /// Units at 0 health are removed from the world; cities never drop below 1.
    pub fn apply_damage(self, world: &mut World, amount: i32) -> Result<(), WorldError> {
        match self {
            Combatant::Unit(id) => world.damage_unit(id, amount).map(|_| ()),
            Combatant::City(id) => world.damage_city(id, amount),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AttackOutcome {
    pub damage_to_attacker: i32,
    pub damage_to_defender: i32,
    pub attacker_destroyed: bool,
    pub defender_destroyed: bool,
    pub city_captured: bool,
}

pub trait CombatResolver {
    /// Damage the attacker should expect to take from this fight.
    fn expected_damage_to_attacker(
        &self,
        world: &World,
        attacker: Combatant,
        defender: Combatant,
    ) -> i32;

    /// Resolves the fight and ends the attacker's turn.
    fn attack(
        &self,
        world: &mut World,
        attacker: Combatant,
        defender: Combatant,
    ) -> Result<AttackOutcome, WorldError>;
}

/// Deterministic strength-ratio resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthCombatResolver;

impl StrengthCombatResolver {
    /// Damage dealt by a side with `strength` against `opposing` strength, at `health`.
    pub fn damage(strength: i32, opposing: i32, health: i32) -> i32 {
        if strength <= 0 {
            return 0;
        }
        if opposing <= 0 {
            return OVERWHELMING_DAMAGE;
        }
        let ratio = strength as f32 / opposing as f32;
        let modifier = if ratio > 1.0 {
            (ratio + 3.0) / 4.0
        } else {
            4.0 / (3.0 + 1.0 / ratio)
        };
        let health_factor = (health.clamp(0, 100) + 200) as f32 / 300.0;
        (BASE_DAMAGE * modifier * health_factor).round() as i32
    }

    fn damage_pair(world: &World, attacker: Combatant, defender: Combatant) -> (i32, i32) {
        let attack = attacker.attacking_strength(world);
        let defense = defender.defending_strength(world);
        let to_defender = Self::damage(attack, defense, attacker.health(world));
        let to_attacker = if attacker.is_ranged(world) {
            0
        } else {
            Self::damage(defense, attack, defender.health(world))
        };
        (to_attacker, to_defender)
    }
}

impl CombatResolver for StrengthCombatResolver {
    fn expected_damage_to_attacker(
        &self,
        world: &World,
        attacker: Combatant,
        defender: Combatant,
    ) -> i32 {
        Self::damage_pair(world, attacker, defender).0
    }

    fn attack(
        &self,
        world: &mut World,
        attacker: Combatant,
        defender: Combatant,
    ) -> Result<AttackOutcome, WorldError> {
        let mut outcome = AttackOutcome::default();
        let target = defender.position(world);

        if let (Combatant::Unit(unit), Combatant::City(city)) = (attacker, defender) {
            if attacker.is_melee(world) && defender.is_capturable_city(world) {
                let new_owner = attacker.civ(world).ok_or(WorldError::UnknownUnit(unit))?;
                capture(world, unit, city, new_owner)?;
                outcome.city_captured = true;
                debug!("unit {unit} captured city {city}");
                return Ok(outcome);
            }
        }

        let (to_attacker, to_defender) = Self::damage_pair(world, attacker, defender);
        outcome.damage_to_defender = to_defender;
        outcome.damage_to_attacker = to_attacker;
        defender.apply_damage(world, to_defender)?;
        attacker.apply_damage(world, to_attacker)?;
        outcome.defender_destroyed = defender.is_defeated(world);
        outcome.attacker_destroyed = attacker.is_defeated(world);

        if let Combatant::Unit(unit) = attacker {
            if !outcome.attacker_destroyed {
                if let (true, Some(hex)) = (outcome.defender_destroyed, target) {
                    if attacker.is_melee(world) && world.can_move_to(unit, hex) {
                        world.move_unit(unit, hex, 0.0)?;
                    }
                }
                world.set_movement(unit, 0.0)?;
            }
        }
        debug!(
            "{attacker:?} hit {defender:?} for {to_defender}, took {to_attacker}"
        );
        Ok(outcome)
    }
}

fn capture(
    world: &mut World,
    unit: UnitId,
    city: CityId,
    new_owner: CivId,
) -> Result<(), WorldError> {
    let hex = world.city(city).map(|c| c.position).ok_or(WorldError::UnknownCity(city))?;
    if let Some(defender) = world.tile(hex).and_then(|t| t.military_unit) {
        world.remove_unit(defender)?;
    }
    world.capture_city(city, new_owner)?;
    world.move_unit(unit, hex, 0.0)?;
    world.set_movement(unit, 0.0)
}
