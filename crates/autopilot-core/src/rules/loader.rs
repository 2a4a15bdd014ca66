use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use crate::ids::{ResourceId, TerrainId, UnitKindId};
use crate::rules::{RawResource, RawTerrain, RawUnitKind, Ruleset};

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("missing referenced id: {0}")]
    MissingId(String),
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ruleset table {0} has more entries than ids can address")]
    TooManyEntries(&'static str),
}

pub enum RulesSource<'a> {
    Embedded,
    /// Directory containing `terrain.yaml`, `resources.yaml` and `units.yaml`.
    Path(String),
    Str {
        terrain: &'a str,
        resources: &'a str,
        units: &'a str,
    },
}

#[derive(Debug, Deserialize)]
struct RawRules {
    terrains: BTreeMap<String, RawTerrain>,
    resources: BTreeMap<String, RawResource>,
    units: BTreeMap<String, RawUnitKind>,
}

pub fn load_rules(source: RulesSource<'_>) -> Result<Ruleset, RulesError> {
    let raw = match source {
        RulesSource::Embedded => parse_raw_rules(
            include_str!("../../data/base/terrain.yaml"),
            include_str!("../../data/base/resources.yaml"),
            include_str!("../../data/base/units.yaml"),
        )?,
        RulesSource::Path(path) => {
            let terrain_yaml = std::fs::read_to_string(format!("{path}/terrain.yaml"))?;
            let resources_yaml = std::fs::read_to_string(format!("{path}/resources.yaml"))?;
            let units_yaml = std::fs::read_to_string(format!("{path}/units.yaml"))?;
            parse_raw_rules(&terrain_yaml, &resources_yaml, &units_yaml)?
        }
        RulesSource::Str {
            terrain,
            resources,
            units,
        } => parse_raw_rules(terrain, resources, units)?,
    };

    compile_rules(raw)
}

/// Ruleset compiled from the YAML shipped with the crate.
pub fn embedded_rules() -> Result<Ruleset, RulesError> {
    load_rules(RulesSource::Embedded)
}

fn parse_raw_rules(
    terrain_yaml: &str,
    resources_yaml: &str,
    units_yaml: &str,
) -> Result<RawRules, RulesError> {
    Ok(RawRules {
        terrains: serde_yaml::from_str(terrain_yaml)?,
        resources: serde_yaml::from_str(resources_yaml)?,
        units: serde_yaml::from_str(units_yaml)?,
    })
}

fn key_ids<V, T>(
    table: &'static str,
    map: &BTreeMap<String, V>,
    make: impl Fn(u16) -> T,
) -> Result<HashMap<String, T>, RulesError> {
    map.keys()
        .enumerate()
        .map(|(i, k)| {
            let raw = u16::try_from(i).map_err(|_| RulesError::TooManyEntries(table))?;
            Ok((k.clone(), make(raw)))
        })
        .collect()
}

fn compile_rules(raw: RawRules) -> Result<Ruleset, RulesError> {
    let terrain_ids = key_ids("terrains", &raw.terrains, TerrainId::new)?;
    let resource_ids = key_ids("resources", &raw.resources, ResourceId::new)?;
    let unit_kind_ids = key_ids("units", &raw.units, UnitKindId::new)?;

    let terrains = raw
        .terrains
        .into_values()
        .map(RawTerrain::compile)
        .collect::<Vec<_>>();
    let resources = raw
        .resources
        .into_values()
        .map(RawResource::compile)
        .collect::<Vec<_>>();
    let unit_kinds = raw
        .units
        .into_values()
        .map(|u| u.compile(&unit_kind_ids))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ruleset {
        terrains,
        resources,
        unit_kinds,
        terrain_ids,
        resource_ids,
        unit_kind_ids,
    })
}
