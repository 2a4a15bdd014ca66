use autopilot_core::{
    Improvement, UnitId, UnitKindId, UnitRole, World, UNIQUE_MUST_SET_UP,
};
use tracing::{debug, warn};

use crate::config::AutomationConfig;
use crate::error::ActionError;

pub const SET_UP: &str = "Set up";
pub const FOUND_CITY: &str = "Found city";
pub const CREATE_FISHING_BOATS: &str = "Create Fishing Boats";
pub const UPGRADE_PREFIX: &str = "Upgrade to ";
pub const FORTIFY_PREFIX: &str = "Fortify ";

#[derive(Debug, Clone, PartialEq)]
pub enum UnitCommand {
    Upgrade { to: UnitKindId, gold_cost: i32 },
    SetUp,
    CreateImprovement(Improvement),
    FoundCity,
    Fortify(u8),
}

/// A named action the catalog currently offers a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitAction {
    pub name: String,
    pub command: UnitCommand,
}

pub trait ActionCatalog {
    fn available_actions(&self, world: &World, unit: UnitId) -> Vec<UnitAction>;

    /// Runs `action`; fails if it is not on offer right now.
    fn execute(
        &self,
        world: &mut World,
        unit: UnitId,
        action: &UnitAction,
    ) -> Result<(), ActionError>;

    fn find_action(
        &self,
        world: &World,
        unit: UnitId,
        matches: &dyn Fn(&str) -> bool,
    ) -> Option<UnitAction> {
        self.available_actions(world, unit)
            .into_iter()
            .find(|a| matches(&a.name))
    }
}

/// Executes the first offered action whose name satisfies `matches`.
///
/// Returns `Ok(false)` when nothing matching is on offer.
pub fn try_action(
    catalog: &dyn ActionCatalog,
    world: &mut World,
    unit: UnitId,
    matches: &dyn Fn(&str) -> bool,
) -> Result<bool, ActionError> {
    let Some(action) = catalog.find_action(world, unit, matches) else {
        return Ok(false);
    };
    catalog.execute(world, unit, &action).inspect_err(|err| {
        warn!("unit {unit}: action {:?} failed: {err}", action.name);
    })?;
    debug!("unit {unit}: {}", action.name);
    Ok(true)
}

/// The actions of the base ruleset.
#[derive(Debug, Clone)]
pub struct StandardActionCatalog {
    upgrade_cost_multiplier: i32,
    upgrade_flat_cost: i32,
    fortify_level: u8,
    city_exclusion_radius: i32,
}

impl Default for StandardActionCatalog {
    fn default() -> Self {
        Self::from_config(&AutomationConfig::default())
    }
}

impl StandardActionCatalog {
    pub fn from_config(config: &AutomationConfig) -> Self {
        Self {
            upgrade_cost_multiplier: config.upgrade_cost_multiplier,
            upgrade_flat_cost: config.upgrade_flat_cost,
            fortify_level: config.fortify_level,
            city_exclusion_radius: config.city_exclusion_radius,
        }
    }

    fn upgrade(&self, world: &World, unit: UnitId) -> Option<UnitAction> {
        let unit = world.unit(unit)?;
        let kind = world.rules().unit_kind(unit.kind);
        let to = kind.upgrades_to?;
        let target = world.rules().unit_kind(to);
        let civ = world.civ(unit.owner)?;
        if let Some(tech) = &target.required_tech {
            if !civ.has_tech(tech) {
                return None;
            }
        }
        let gold_cost =
            (target.cost - kind.cost) * self.upgrade_cost_multiplier + self.upgrade_flat_cost;
        (civ.gold >= gold_cost).then(|| UnitAction {
            name: format!("{UPGRADE_PREFIX}{}", target.name),
            command: UnitCommand::Upgrade { to, gold_cost },
        })
    }

    fn create_fishing_boats(&self, world: &World, unit: UnitId) -> Option<UnitAction> {
        let owner = world.unit(unit)?.owner;
        let tile = world.tile(world.unit(unit)?.position)?;
        let workable = tile
            .resource
            .is_some_and(|r| world.rules().resource(r).water)
            && tile.improvement.is_none()
            && tile.owner.is_none_or(|o| o == owner);
        workable.then(|| UnitAction {
            name: CREATE_FISHING_BOATS.to_string(),
            command: UnitCommand::CreateImprovement(Improvement::FishingBoats),
        })
    }
}

impl ActionCatalog for StandardActionCatalog {
    fn available_actions(&self, world: &World, id: UnitId) -> Vec<UnitAction> {
        let (Some(unit), Some(kind)) = (world.unit(id), world.unit_kind(id)) else {
            return Vec::new();
        };
        if !unit.has_movement_left() {
            return Vec::new();
        }

        let mut out = Vec::new();
        match kind.role() {
            UnitRole::Founder => {
                if !world.is_water(unit.position)
                    && !world.city_within(unit.position, self.city_exclusion_radius)
                {
                    out.push(UnitAction {
                        name: FOUND_CITY.to_string(),
                        command: UnitCommand::FoundCity,
                    });
                }
            }
            UnitRole::NavalImprover => out.extend(self.create_fishing_boats(world, id)),
            UnitRole::Combat => {
                out.extend(self.upgrade(world, id));
                if kind.has_unique(UNIQUE_MUST_SET_UP) && !unit.set_up {
                    out.push(UnitAction {
                        name: SET_UP.to_string(),
                        command: UnitCommand::SetUp,
                    });
                }
                if !unit.is_fortified() {
                    out.push(UnitAction {
                        name: format!("{FORTIFY_PREFIX}{}", self.fortify_level),
                        command: UnitCommand::Fortify(self.fortify_level),
                    });
                }
            }
            UnitRole::Worker | UnitRole::Special => {}
        }
        out
    }

    fn execute(
        &self,
        world: &mut World,
        unit: UnitId,
        action: &UnitAction,
    ) -> Result<(), ActionError> {
        if !self.available_actions(world, unit).contains(action) {
            return Err(ActionError::NotAvailable {
                unit,
                action: action.name.clone(),
            });
        }
        match &action.command {
            UnitCommand::Upgrade { to, gold_cost } => world.upgrade_unit(unit, *to, *gold_cost)?,
            UnitCommand::SetUp => world.set_up(unit)?,
            UnitCommand::CreateImprovement(improvement) => {
                let hex = world
                    .unit(unit)
                    .map(|u| u.position)
                    .ok_or(autopilot_core::WorldError::UnknownUnit(unit))?;
                world.create_improvement(hex, *improvement)?;
                world.remove_unit(unit)?;
            }
            UnitCommand::FoundCity => {
                world.found_city(unit)?;
            }
            UnitCommand::Fortify(level) => world.fortify(unit, *level)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use autopilot_core::{embedded_rules, CivId, GameMap, Hex};

    use super::*;

    fn world() -> World {
        let rules = embedded_rules().expect("rules load");
        let plains = rules.terrain_id("plains").expect("plains");
        World::new(rules, GameMap::new(8, 8, plains), &["Rome"])
    }

    fn names(catalog: &StandardActionCatalog, world: &World, unit: UnitId) -> Vec<String> {
        catalog
            .available_actions(world, unit)
            .into_iter()
            .map(|a| a.name)
            .collect()
    }

    #[test]
    fn upgrade_is_offered_once_affordable_and_researched() {
        let mut world = world();
        let catalog = StandardActionCatalog::default();
        let warrior = world
            .spawn_unit_named("warrior", CivId(0), Hex::new(2, 2))
            .expect("spawn");
        // (75 - 40) * 2 + 10
        world.civ_mut(CivId(0)).unwrap().gold = 80;
        assert_eq!(names(&catalog, &world, warrior), vec!["Fortify 0"]);

        world.civ_mut(CivId(0)).unwrap().techs.insert("Bronze Working".into());
        assert_eq!(
            names(&catalog, &world, warrior),
            vec!["Upgrade to Swordsman", "Fortify 0"]
        );
    }

    #[test]
    fn siege_units_must_set_up_and_nothing_is_offered_without_movement() {
        let mut world = world();
        let catalog = StandardActionCatalog::default();
        let catapult = world
            .spawn_unit_named("catapult", CivId(0), Hex::new(2, 2))
            .expect("spawn");
        assert!(names(&catalog, &world, catapult).contains(&SET_UP.to_string()));

        world.set_movement(catapult, 0.0).expect("set");
        assert!(catalog.available_actions(&world, catapult).is_empty());
    }

    #[test]
    fn executing_an_unoffered_action_fails() {
        let mut world = world();
        let catalog = StandardActionCatalog::default();
        let warrior = world
            .spawn_unit_named("warrior", CivId(0), Hex::new(2, 2))
            .expect("spawn");
        let bogus = UnitAction {
            name: FOUND_CITY.to_string(),
            command: UnitCommand::FoundCity,
        };
        assert!(matches!(
            catalog.execute(&mut world, warrior, &bogus),
            Err(ActionError::NotAvailable { .. })
        ));
        assert!(world.unit(warrior).is_some());
    }

    #[test]
    fn fortify_uses_the_configured_level() {
        let mut world = world();
        let catalog = StandardActionCatalog::default();
        let warrior = world
            .spawn_unit_named("warrior", CivId(0), Hex::new(2, 2))
            .expect("spawn");
        let done = try_action(&catalog, &mut world, warrior, &|n| n.starts_with(FORTIFY_PREFIX))
            .expect("fortify");
        assert!(done);
        let unit = world.unit(warrior).unwrap();
        assert_eq!(unit.fortification, Some(0));
        assert_eq!(unit.movement, 0.0);
    }
}
