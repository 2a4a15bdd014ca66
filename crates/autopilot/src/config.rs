//! Tunable constants of the automation policy.

use std::path::Path;

use autopilot_core::UnitKind;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Every threshold and radius the planners use. Missing YAML keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Below this health the unit heals before considering combat.
    pub heal_below_critical: i32,
    /// Below this health the unit heals instead of advancing on enemies.
    pub heal_below_wounded: i32,
    /// Below this health the unit heals instead of marching on enemy cities.
    pub heal_below_full: i32,

    /// An attack-from tile must leave strictly more than this much movement.
    pub attack_slack: f32,
    pub enemy_advance_radius: i32,
    /// Enemy cities this close make a friendly city worth garrisoning in wartime.
    pub garrison_threat_radius: i32,

    pub city_exclusion_radius: i32,
    pub site_ranking_radius: i32,
    pub site_candidate_radius: i32,
    pub coastal_site_bonus: f32,
    pub site_top_tiles: usize,
    pub site_outer_ring_picks: usize,

    pub explore_radius: i32,
    pub automated_explore_radius: i32,
    /// How far from an own city a sea resource is still worth a work boat.
    pub work_boat_radius: i32,

    pub upgrade_cost_multiplier: i32,
    pub upgrade_flat_cost: i32,
    pub fortify_level: u8,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            heal_below_critical: 50,
            heal_below_wounded: 80,
            heal_below_full: 100,
            attack_slack: 0.1,
            enemy_advance_radius: 5,
            garrison_threat_radius: 5,
            city_exclusion_radius: 3,
            site_ranking_radius: 7,
            site_candidate_radius: 5,
            coastal_site_bonus: 5.0,
            site_top_tiles: 5,
            site_outer_ring_picks: 2,
            explore_radius: 5,
            automated_explore_radius: 10,
            work_boat_radius: 3,
            upgrade_cost_multiplier: 2,
            upgrade_flat_cost: 10,
            fortify_level: 0,
        }
    }
}

impl AutomationConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Gold needed to upgrade a unit of kind `from` into `to`.
    pub fn upgrade_cost(&self, from: &UnitKind, to: &UnitKind) -> i32 {
        (to.cost - from.cost) * self.upgrade_cost_multiplier + self.upgrade_flat_cost
    }

    pub fn attack_slack_milli(&self) -> u32 {
        autopilot_nav::to_milli(self.attack_slack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AutomationConfig::from_yaml_str("heal_below_critical: 40\nexplore_radius: 3\n")
            .expect("config");
        assert_eq!(config.heal_below_critical, 40);
        assert_eq!(config.explore_radius, 3);
        assert_eq!(config.heal_below_wounded, 80);
        assert_eq!(config.attack_slack_milli(), 100);
        assert_eq!(config.work_boat_radius, config.city_exclusion_radius);
    }

    #[test]
    fn work_radius_is_tuned_apart_from_the_exclusion_zone() {
        let config = AutomationConfig::from_yaml_str("work_boat_radius: 2\n").expect("config");
        assert_eq!(config.work_boat_radius, 2);
        assert_eq!(config.city_exclusion_radius, 3);
    }

    #[test]
    fn empty_document_is_default() {
        let config = AutomationConfig::from_yaml_str("{}").expect("config");
        assert_eq!(config, AutomationConfig::default());
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(AutomationConfig::from_yaml_str("explore_radius: far").is_err());
    }
}
