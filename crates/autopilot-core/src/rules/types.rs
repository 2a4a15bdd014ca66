use std::collections::HashMap;

use serde::Deserialize;

use crate::ids::{ResourceId, TerrainId, UnitKindId};
use crate::rules::RulesError;

pub const UNIQUE_INDIRECT_FIRE: &str = "Indirect fire";
pub const UNIQUE_NO_DEFENSIVE_TERRAIN_BONUS: &str = "No defensive terrain bonus";
pub const UNIQUE_MUST_SET_UP: &str = "Must set up";

#[derive(Debug, Clone)]
pub struct Ruleset {
    pub terrains: Vec<Terrain>,
    pub resources: Vec<Resource>,
    pub unit_kinds: Vec<UnitKind>,

    pub terrain_ids: HashMap<String, TerrainId>,
    pub resource_ids: HashMap<String, ResourceId>,
    pub unit_kind_ids: HashMap<String, UnitKindId>,
}

impl Ruleset {
    pub fn terrain(&self, id: TerrainId) -> &Terrain {
        &self.terrains[id.index()]
    }

    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }

    pub fn unit_kind(&self, id: UnitKindId) -> &UnitKind {
        &self.unit_kinds[id.index()]
    }

    pub fn terrain_id(&self, key: &str) -> Option<TerrainId> {
        self.terrain_ids.get(key).copied()
    }

    pub fn resource_id(&self, key: &str) -> Option<ResourceId> {
        self.resource_ids.get(key).copied()
    }

    pub fn unit_kind_id(&self, key: &str) -> Option<UnitKindId> {
        self.unit_kind_ids.get(key).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Yields {
    #[serde(default)]
    pub food: i32,
    #[serde(default)]
    pub production: i32,
    #[serde(default)]
    pub gold: i32,
}

impl Yields {
    pub fn total(self) -> i32 {
        self.food + self.production + self.gold
    }
}

impl std::ops::Add for Yields {
    type Output = Yields;

    fn add(self, other: Yields) -> Yields {
        Yields {
            food: self.food + other.food,
            production: self.production + other.production,
            gold: self.gold + other.gold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainClass {
    Land,
    Water,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTerrain {
    pub name: String,
    pub class: TerrainClass,
    #[serde(default = "default_move_cost")]
    pub move_cost: u32,
    #[serde(default)]
    pub defense_bonus: i32,
    #[serde(default)]
    pub yields: Yields,
    #[serde(default)]
    pub impassable: bool,
    #[serde(default)]
    pub blocks_sight: bool,
}

impl RawTerrain {
    pub fn compile(self) -> Terrain {
        Terrain {
            name: self.name,
            class: self.class,
            move_cost: self.move_cost.max(1),
            defense_bonus: self.defense_bonus,
            yields: self.yields,
            impassable: self.impassable,
            blocks_sight: self.blocks_sight,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Terrain {
    pub name: String,
    pub class: TerrainClass,
    /// Whole movement points spent entering a tile of this terrain.
    pub move_cost: u32,
    /// Percent added to a defender's strength.
    pub defense_bonus: i32,
    pub yields: Yields,
    pub impassable: bool,
    pub blocks_sight: bool,
}

impl Terrain {
    pub fn is_water(&self) -> bool {
        self.class == TerrainClass::Water
    }
}

fn default_move_cost() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    pub name: String,
    #[serde(default)]
    pub yields: Yields,
    #[serde(default)]
    pub water: bool,
}

impl RawResource {
    pub fn compile(self) -> Resource {
        Resource {
            name: self.name,
            yields: self.yields,
            water: self.water,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub name: String,
    pub yields: Yields,
    /// Sea resource a naval improver can work.
    pub water: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Melee,
    Ranged,
    Civilian,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitDomain {
    #[default]
    Land,
    Water,
}

/// What automation does with a unit, derived from its kind name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    Founder,
    Worker,
    NavalImprover,
    Special,
    Combat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnitKind {
    pub name: String,
    pub cost: i32,
    pub class: UnitClass,
    #[serde(default)]
    pub domain: UnitDomain,
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub ranged_strength: i32,
    #[serde(default)]
    pub range: i32,
    #[serde(default = "default_movement")]
    pub movement: u32,
    #[serde(default)]
    pub can_embark: bool,
    #[serde(default)]
    pub upgrades_to: Option<String>,
    #[serde(default)]
    pub required_tech: Option<String>,
    #[serde(default)]
    pub uniques: Vec<String>,
}

impl RawUnitKind {
    pub fn compile(
        self,
        unit_ids: &HashMap<String, UnitKindId>,
    ) -> Result<UnitKind, RulesError> {
        let upgrades_to = match self.upgrades_to {
            Some(key) => Some(
                *unit_ids
                    .get(&key)
                    .ok_or(RulesError::MissingId(key))?,
            ),
            None => None,
        };
        Ok(UnitKind {
            name: self.name,
            cost: self.cost,
            class: self.class,
            domain: self.domain,
            strength: self.strength,
            ranged_strength: self.ranged_strength,
            range: self.range.max(1),
            movement: self.movement,
            can_embark: self.can_embark,
            upgrades_to,
            required_tech: self.required_tech,
            uniques: self.uniques,
        })
    }
}

fn default_movement() -> u32 {
    2
}

#[derive(Debug, Clone)]
pub struct UnitKind {
    pub name: String,
    pub cost: i32,
    pub class: UnitClass,
    pub domain: UnitDomain,
    pub strength: i32,
    pub ranged_strength: i32,
    /// Attack range in tiles; 1 for melee.
    pub range: i32,
    /// Whole movement points per turn.
    pub movement: u32,
    pub can_embark: bool,
    pub upgrades_to: Option<UnitKindId>,
    pub required_tech: Option<String>,
    pub uniques: Vec<String>,
}

impl UnitKind {
    pub fn is_melee(&self) -> bool {
        self.class == UnitClass::Melee
    }

    pub fn is_ranged(&self) -> bool {
        self.class == UnitClass::Ranged
    }

    pub fn is_civilian(&self) -> bool {
        self.class == UnitClass::Civilian
    }

    pub fn is_military(&self) -> bool {
        !self.is_civilian()
    }

    pub fn is_water(&self) -> bool {
        self.domain == UnitDomain::Water
    }

    pub fn has_unique(&self, unique: &str) -> bool {
        self.uniques.iter().any(|u| u == unique)
    }

    pub fn role(&self) -> UnitRole {
        match self.name.as_str() {
            "Settler" => UnitRole::Founder,
            "Worker" => UnitRole::Worker,
            "Work Boats" => UnitRole::NavalImprover,
            name if name.starts_with("Great") => UnitRole::Special,
            _ => UnitRole::Combat,
        }
    }
}
