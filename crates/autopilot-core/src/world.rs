use std::collections::BTreeSet;

use tracing::debug;

use crate::city::City;
use crate::civ::{Civilization, Diplomacy};
use crate::entities::EntityStore;
use crate::error::WorldError;
use crate::hex::Hex;
use crate::ids::{CityId, CivId, UnitId, UnitKindId};
use crate::map::{GameMap, Improvement, Tile};
use crate::rules::{Ruleset, Terrain, UnitKind};
use crate::unit::{Unit, MAX_UNIT_HEALTH};

pub const SIGHT_RADIUS: i32 = 2;
pub const RUIN_GOLD_BONUS: i32 = 25;
/// Cities may not be founded this close to another city center.
pub const MIN_CITY_DISTANCE: i32 = 3;
pub const MAX_FORTIFICATION: u8 = 2;
pub const FORTIFIED_HEAL: i32 = 10;
pub const FORTIFIED_HEAL_IN_CITY: i32 = 20;

/// What stands on a tile that could be attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Occupant {
    City(CityId),
    Unit(UnitId),
}

/// The shared game state every automated decision reads and mutates.
#[derive(Clone, Debug)]
pub struct World {
    rules: Ruleset,
    map: GameMap,
    units: EntityStore<UnitId, Unit>,
    cities: EntityStore<CityId, City>,
    civs: Vec<Civilization>,
    diplomacy: Diplomacy,
    turn: u32,
}

impl World {
    pub fn new(rules: Ruleset, map: GameMap, civ_names: &[&str]) -> Self {
        let civs = civ_names
            .iter()
            .enumerate()
            .map(|(i, name)| Civilization::new(CivId(i as u8), *name))
            .collect::<Vec<_>>();
        let diplomacy = Diplomacy::new(civs.len());
        Self {
            rules,
            map,
            units: EntityStore::default(),
            cities: EntityStore::default(),
            civs,
            diplomacy,
            turn: 0,
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    /// Direct tile access for scenario construction (terrain, resources, roads).
    pub fn map_mut(&mut self) -> &mut GameMap {
        &mut self.map
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn tile(&self, hex: Hex) -> Option<&Tile> {
        self.map.get(hex)
    }

    pub fn terrain_at(&self, hex: Hex) -> Option<&Terrain> {
        self.map.get(hex).map(|t| self.rules.terrain(t.terrain))
    }

    pub fn is_water(&self, hex: Hex) -> bool {
        self.terrain_at(hex).is_some_and(Terrain::is_water)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn unit_kind(&self, id: UnitId) -> Option<&UnitKind> {
        self.units.get(id).map(|u| self.rules.unit_kind(u.kind))
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id)
    }

    pub fn civ(&self, id: CivId) -> Option<&Civilization> {
        self.civs.get(id.index())
    }

    pub fn civ_mut(&mut self, id: CivId) -> Option<&mut Civilization> {
        self.civs.get_mut(id.index())
    }

    pub fn civs(&self) -> &[Civilization] {
        &self.civs
    }

    pub fn diplomacy(&self) -> &Diplomacy {
        &self.diplomacy
    }

    pub fn set_war(&mut self, a: CivId, b: CivId, at_war: bool) {
        self.diplomacy.set_war(a, b, at_war);
    }

    pub fn is_at_war(&self, a: CivId, b: CivId) -> bool {
        self.diplomacy.is_at_war(a, b)
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &Unit)> + '_ {
        self.units.iter()
    }

    pub fn cities(&self) -> impl Iterator<Item = (CityId, &City)> + '_ {
        self.cities.iter()
    }

    /// Units of `civ` in ascending id order.
    pub fn units_of(&self, civ: CivId) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|(_, u)| u.owner == civ)
            .map(|(id, _)| id)
            .collect()
    }

    /// Cities of `civ` in ascending id order.
    pub fn cities_of(&self, civ: CivId) -> Vec<CityId> {
        self.cities
            .iter()
            .filter(|(_, c)| c.owner == civ)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn city_at(&self, hex: Hex) -> Option<CityId> {
        self.map.get(hex).and_then(|t| t.city)
    }

    /// Occupant an attack into `hex` would hit: the city, else the military
    /// unit, else the civilian unit.
    pub fn combatant_at(&self, hex: Hex) -> Option<Occupant> {
        let tile = self.map.get(hex)?;
        if let Some(city) = tile.city {
            return Some(Occupant::City(city));
        }
        tile.military_unit
            .or(tile.civilian_unit)
            .map(Occupant::Unit)
    }

    pub fn occupant_owner(&self, occupant: Occupant) -> Option<CivId> {
        match occupant {
            Occupant::City(id) => self.city(id).map(|c| c.owner),
            Occupant::Unit(id) => self.unit(id).map(|u| u.owner),
        }
    }

    pub fn is_embarked(&self, id: UnitId) -> bool {
        let Some(unit) = self.unit(id) else {
            return false;
        };
        !self.rules.unit_kind(unit.kind).is_water() && self.is_water(unit.position)
    }

    /// Terrain and domain test only; ignores cities and other units.
    pub fn can_enter_terrain(&self, id: UnitId, hex: Hex) -> bool {
        let (Some(unit), Some(tile)) = (self.unit(id), self.map.get(hex)) else {
            return false;
        };
        let kind = self.rules.unit_kind(unit.kind);
        let terrain = self.rules.terrain(tile.terrain);
        if terrain.impassable {
            return false;
        }
        if kind.is_water() {
            terrain.is_water() || tile.city.is_some()
        } else {
            !terrain.is_water() || kind.can_embark
        }
    }

    /// Whether the unit may travel through `hex` (it may not be able to stop there).
    pub fn can_pass_through(&self, id: UnitId, hex: Hex) -> bool {
        if !self.can_enter_terrain(id, hex) {
            return false;
        }
        let (Some(unit), Some(tile)) = (self.unit(id), self.map.get(hex)) else {
            return false;
        };
        if let Some(city) = tile.city.and_then(|c| self.city(c)) {
            if city.owner != unit.owner {
                return false;
            }
        }
        tile.units()
            .filter_map(|other| self.unit(other))
            .all(|other| other.owner == unit.owner)
    }

    /// Whether the unit may end its move on `hex`.
    pub fn can_move_to(&self, id: UnitId, hex: Hex) -> bool {
        if !self.can_pass_through(id, hex) {
            return false;
        }
        let (Some(unit), Some(tile)) = (self.unit(id), self.map.get(hex)) else {
            return false;
        };
        let slot = if self.rules.unit_kind(unit.kind).is_civilian() {
            tile.civilian_unit
        } else {
            tile.military_unit
        };
        slot.is_none_or(|occupant| occupant == id)
    }

    /// Hexes visible from `origin` within `radius`, nearest first.
    ///
    /// Adjacent tiles are always visible; a farther tile is visible when one of
    /// its neighbours one step closer is visible and does not block sight.
    pub fn viewable_from(&self, origin: Hex, radius: i32) -> Vec<Hex> {
        let mut visible: BTreeSet<Hex> = BTreeSet::new();
        let mut out = Vec::new();
        for hex in self.map.tiles_in_distance(origin, radius) {
            let d = hex.distance(origin);
            let seen = d <= 1
                || hex.neighbors().iter().any(|n| {
                    n.distance(origin) == d - 1
                        && visible.contains(n)
                        && !self.terrain_at(*n).is_some_and(|t| t.blocks_sight)
                });
            if seen {
                visible.insert(hex);
                out.push(hex);
            }
        }
        out
    }

    /// Union of what every unit and city of `civ` can currently see.
    pub fn viewable_tiles(&self, civ: CivId) -> BTreeSet<Hex> {
        let unit_origins = self
            .units
            .iter()
            .filter(|(_, u)| u.owner == civ)
            .map(|(_, u)| u.position);
        let city_origins = self
            .cities
            .iter()
            .filter(|(_, c)| c.owner == civ)
            .map(|(_, c)| c.position);
        unit_origins
            .chain(city_origins)
            .flat_map(|origin| self.viewable_from(origin, SIGHT_RADIUS))
            .collect()
    }

    pub fn has_explored(&self, civ: CivId, hex: Hex) -> bool {
        self.civ(civ).is_some_and(|c| c.has_explored(hex))
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn spawn_unit(
        &mut self,
        kind: UnitKindId,
        owner: CivId,
        hex: Hex,
    ) -> Result<UnitId, WorldError> {
        if self.civ(owner).is_none() {
            return Err(WorldError::UnknownCiv(owner));
        }
        if kind.index() >= self.rules.unit_kinds.len() {
            return Err(WorldError::UnknownKind(format!("{kind:?}")));
        }
        let civilian = self.rules.unit_kind(kind).is_civilian();
        let tile = self.map.get(hex).ok_or(WorldError::OutOfBounds(hex))?;
        let slot = if civilian {
            tile.civilian_unit
        } else {
            tile.military_unit
        };
        if slot.is_some() {
            return Err(WorldError::Occupied(hex));
        }

        let unit = Unit::new(kind, owner, hex, &self.rules);
        let id = self.units.insert(unit);
        self.occupy(id, hex, civilian);
        self.reveal(owner, hex);
        Ok(id)
    }

    /// Spawns a unit by its ruleset key.
    pub fn spawn_unit_named(
        &mut self,
        key: &str,
        owner: CivId,
        hex: Hex,
    ) -> Result<UnitId, WorldError> {
        let kind = self
            .rules
            .unit_kind_id(key)
            .ok_or_else(|| WorldError::UnknownKind(key.to_string()))?;
        self.spawn_unit(kind, owner, hex)
    }

    /// Moves the unit to `to`, spending `cost` movement (clamped at zero).
    ///
    /// Entering ancient ruins loots them. The destination's surroundings are
    /// added to the owner's explored set.
    pub fn move_unit(&mut self, id: UnitId, to: Hex, cost: f32) -> Result<(), WorldError> {
        let unit = self.units.get(id).ok_or(WorldError::UnknownUnit(id))?;
        let from = unit.position;
        let owner = unit.owner;
        if from == to {
            return Ok(());
        }
        if !self.map.contains(to) {
            return Err(WorldError::OutOfBounds(to));
        }
        if !self.can_move_to(id, to) {
            return Err(WorldError::Occupied(to));
        }

        let civilian = self.rules.unit_kind(unit.kind).is_civilian();
        self.vacate(id, from);
        self.occupy(id, to, civilian);
        if let Some(unit) = self.units.get_mut(id) {
            unit.position = to;
            unit.movement = (unit.movement - cost).max(0.0);
            unit.break_stance();
        }

        if let Some(tile) = self.map.get_mut(to) {
            if tile.improvement == Some(Improvement::AncientRuins) {
                tile.improvement = None;
                if let Some(civ) = self.civs.get_mut(owner.index()) {
                    civ.gold += RUIN_GOLD_BONUS;
                }
                debug!("unit {id} looted ruins at {to}");
            }
        }
        self.reveal(owner, to);
        Ok(())
    }

    pub fn set_movement(&mut self, id: UnitId, movement: f32) -> Result<(), WorldError> {
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.movement = movement.max(0.0);
        Ok(())
    }

    /// Hands the unit to, or takes it back from, turn automation.
    pub fn set_automated(&mut self, id: UnitId, automated: bool) -> Result<(), WorldError> {
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.automated = automated;
        Ok(())
    }

    /// Fortifies in place; uses up the rest of the turn.
    pub fn fortify(&mut self, id: UnitId, level: u8) -> Result<(), WorldError> {
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.fortification = Some(level);
        unit.movement = 0.0;
        Ok(())
    }

    /// Sets up a siege unit; costs one movement point.
    pub fn set_up(&mut self, id: UnitId) -> Result<(), WorldError> {
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.set_up = true;
        unit.movement = (unit.movement - 1.0).max(0.0);
        Ok(())
    }

    pub fn upgrade_unit(
        &mut self,
        id: UnitId,
        to: UnitKindId,
        gold_cost: i32,
    ) -> Result<(), WorldError> {
        if to.index() >= self.rules.unit_kinds.len() {
            return Err(WorldError::UnknownKind(format!("{to:?}")));
        }
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.kind = to;
        unit.movement = 0.0;
        unit.break_stance();
        let owner = unit.owner;
        let civ = self
            .civs
            .get_mut(owner.index())
            .ok_or(WorldError::UnknownCiv(owner))?;
        civ.gold -= gold_cost;
        Ok(())
    }

    pub fn create_improvement(
        &mut self,
        hex: Hex,
        improvement: Improvement,
    ) -> Result<(), WorldError> {
        let tile = self.map.get_mut(hex).ok_or(WorldError::OutOfBounds(hex))?;
        tile.improvement = Some(improvement);
        Ok(())
    }

    pub fn remove_unit(&mut self, id: UnitId) -> Result<Unit, WorldError> {
        let position = self
            .units
            .get(id)
            .map(|u| u.position)
            .ok_or(WorldError::UnknownUnit(id))?;
        self.vacate(id, position);
        self.units.remove(id).ok_or(WorldError::UnknownUnit(id))
    }

    /// Turns the founding unit into a city on its tile.
    pub fn found_city(&mut self, founder: UnitId) -> Result<CityId, WorldError> {
        let unit = self.units.get(founder).ok_or(WorldError::UnknownUnit(founder))?;
        let (hex, owner) = (unit.position, unit.owner);
        if self.is_water(hex) {
            return Err(WorldError::IllegalFounding {
                hex,
                reason: "water tile",
            });
        }
        if self.city_within(hex, MIN_CITY_DISTANCE) {
            return Err(WorldError::IllegalFounding {
                hex,
                reason: "another city is too close",
            });
        }
        let name = {
            let civ = self.civ(owner).ok_or(WorldError::UnknownCiv(owner))?;
            format!("{} {}", civ.name, self.cities_of(owner).len() + 1)
        };
        self.remove_unit(founder)?;
        let city = self.add_city(name, owner, hex)?;
        debug!("unit {founder} founded city {city} at {hex}");
        Ok(city)
    }

    /// Places a city without founding checks and claims the unowned tiles around it.
    pub fn add_city(
        &mut self,
        name: impl Into<String>,
        owner: CivId,
        hex: Hex,
    ) -> Result<CityId, WorldError> {
        if self.civ(owner).is_none() {
            return Err(WorldError::UnknownCiv(owner));
        }
        let tile = self.map.get(hex).ok_or(WorldError::OutOfBounds(hex))?;
        if tile.city.is_some() {
            return Err(WorldError::Occupied(hex));
        }
        let id = self.cities.insert(City::new(name, owner, hex));
        for claimed in self.map.tiles_in_distance(hex, 1) {
            if let Some(tile) = self.map.get_mut(claimed) {
                if claimed == hex || tile.owner.is_none() {
                    tile.owner = Some(owner);
                }
            }
        }
        if let Some(tile) = self.map.get_mut(hex) {
            tile.city = Some(id);
        }
        self.reveal(owner, hex);
        Ok(id)
    }

    pub fn city_within(&self, hex: Hex, radius: i32) -> bool {
        self.cities.iter().any(|(_, c)| c.position.distance(hex) <= radius)
    }

    /// Returns `true` when the unit was destroyed.
    pub fn damage_unit(&mut self, id: UnitId, amount: i32) -> Result<bool, WorldError> {
        let unit = self.units.get_mut(id).ok_or(WorldError::UnknownUnit(id))?;
        unit.health -= amount.max(0);
        if unit.health <= 0 {
            self.remove_unit(id)?;
            debug!("unit {id} destroyed");
            return Ok(true);
        }
        Ok(false)
    }

    /// City health never drops below 1.
    pub fn damage_city(&mut self, id: CityId, amount: i32) -> Result<(), WorldError> {
        let city = self.cities.get_mut(id).ok_or(WorldError::UnknownCity(id))?;
        city.health = (city.health - amount.max(0)).max(1);
        Ok(())
    }

    pub fn capture_city(&mut self, id: CityId, new_owner: CivId) -> Result<(), WorldError> {
        if self.civ(new_owner).is_none() {
            return Err(WorldError::UnknownCiv(new_owner));
        }
        let city = self.cities.get_mut(id).ok_or(WorldError::UnknownCity(id))?;
        let old_owner = city.owner;
        let position = city.position;
        city.owner = new_owner;
        city.health = (city.max_health / 2).max(1);

        for hex in self.map.tiles_in_distance(position, 1) {
            if let Some(tile) = self.map.get_mut(hex) {
                if tile.owner == Some(old_owner) {
                    tile.owner = Some(new_owner);
                }
            }
        }
        let stranded = self
            .map
            .get(position)
            .and_then(|t| t.civilian_unit)
            .filter(|u| self.unit(*u).is_some_and(|u| u.owner == old_owner));
        if let Some(unit) = stranded {
            self.remove_unit(unit)?;
        }
        debug!("city {id} captured by {new_owner:?}");
        Ok(())
    }

    /// Restores movement and clears set-up for every unit of `civ`; fortified
    /// units heal and dig in one level deeper.
    pub fn start_turn(&mut self, civ: CivId) {
        let own_cities = self
            .cities
            .iter()
            .filter(|(_, c)| c.owner == civ)
            .map(|(_, c)| c.position)
            .collect::<BTreeSet<_>>();
        for id in self.units_of(civ) {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            unit.movement = unit.max_movement(&self.rules);
            unit.set_up = false;
            if let Some(level) = unit.fortification {
                unit.fortification = Some(level.saturating_add(1).min(MAX_FORTIFICATION));
                let heal = if own_cities.contains(&unit.position) {
                    FORTIFIED_HEAL_IN_CITY
                } else {
                    FORTIFIED_HEAL
                };
                unit.health = (unit.health + heal).min(MAX_UNIT_HEALTH);
            }
        }
    }

    pub fn advance_turn(&mut self) -> u32 {
        self.turn += 1;
        self.turn
    }

    fn occupy(&mut self, id: UnitId, hex: Hex, civilian: bool) {
        if let Some(tile) = self.map.get_mut(hex) {
            if civilian {
                tile.civilian_unit = Some(id);
            } else {
                tile.military_unit = Some(id);
            }
        }
    }

    fn vacate(&mut self, id: UnitId, hex: Hex) {
        if let Some(tile) = self.map.get_mut(hex) {
            if tile.military_unit == Some(id) {
                tile.military_unit = None;
            }
            if tile.civilian_unit == Some(id) {
                tile.civilian_unit = None;
            }
        }
    }

    fn reveal(&mut self, civ: CivId, origin: Hex) {
        let seen = self.viewable_from(origin, SIGHT_RADIUS);
        if let Some(civ) = self.civs.get_mut(civ.index()) {
            civ.explored.extend(seen);
        }
    }
}
