//! Tile scoring for city sites and healing spots.

use std::collections::BTreeMap;

use autopilot_core::{CivId, Hex, UnitId, World};

use crate::config::AutomationConfig;

/// General desirability of a single tile for a civilization.
pub trait TileValuer {
    fn tile_value(&self, world: &World, hex: Hex, civ: CivId) -> f32;
}

/// Values a tile by the sum of its terrain and resource yields.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldTileValuer;

impl TileValuer for YieldTileValuer {
    fn tile_value(&self, world: &World, hex: Hex, _civ: CivId) -> f32 {
        let Some(tile) = world.tile(hex) else {
            return 0.0;
        };
        let rules = world.rules();
        let mut yields = rules.terrain(tile.terrain).yields;
        if let Some(resource) = tile.resource {
            yields = yields + rules.resource(resource).yields;
        }
        yields.total() as f32
    }
}

/// How good a tile is for recovering health. Variants are ordered worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HealingRank {
    Hostile = 0,
    Unowned = 1,
    Friendly = 2,
    OwnCity = 3,
}

pub fn healing_rank(world: &World, unit: UnitId, hex: Hex) -> HealingRank {
    let (Some(unit), Some(tile)) = (world.unit(unit), world.tile(hex)) else {
        return HealingRank::Hostile;
    };
    let own_city = tile
        .city
        .and_then(|c| world.city(c))
        .is_some_and(|c| c.owner == unit.owner);
    match tile.owner {
        _ if own_city => HealingRank::OwnCity,
        None => HealingRank::Unowned,
        Some(owner) if !world.is_at_war(unit.owner, owner) => HealingRank::Friendly,
        Some(_) => HealingRank::Hostile,
    }
}

/// Scores every on-map tile within `radius` of `center` once, for reuse across sites.
pub fn rank_tiles_around(
    world: &World,
    valuer: &dyn TileValuer,
    center: Hex,
    radius: i32,
    civ: CivId,
) -> BTreeMap<Hex, f32> {
    world
        .map()
        .tiles_in_distance(center, radius)
        .into_iter()
        .map(|hex| (hex, valuer.tile_value(world, hex, civ)))
        .collect()
}

/// City-site score: the best `site_top_tiles` among the neighbours plus the
/// best `site_outer_ring_picks` of ring 2, plus a bonus next to water.
pub fn rank_tile_as_city_center(
    world: &World,
    center: Hex,
    rankings: &BTreeMap<Hex, f32>,
    config: &AutomationConfig,
) -> f32 {
    let value = |hex: &Hex| rankings.get(hex).copied().unwrap_or(0.0);
    let by_value_desc = |a: &f32, b: &f32| b.total_cmp(a);

    let neighbors = world.map().tiles_at_distance(center, 1);
    let mut outer = world
        .map()
        .tiles_at_distance(center, 2)
        .iter()
        .map(value)
        .collect::<Vec<_>>();
    outer.sort_by(by_value_desc);

    let mut pool = neighbors.iter().map(value).collect::<Vec<_>>();
    pool.extend(outer.into_iter().take(config.site_outer_ring_picks));
    pool.sort_by(by_value_desc);

    let mut score: f32 = pool.into_iter().take(config.site_top_tiles).sum();
    if neighbors.iter().any(|n| world.is_water(*n)) {
        score += config.coastal_site_bonus;
    }
    score
}

#[cfg(test)]
mod tests {
    use autopilot_core::{embedded_rules, GameMap};

    use super::*;

    fn world() -> World {
        let rules = embedded_rules().expect("rules load");
        let desert = rules.terrain_id("desert").expect("desert");
        World::new(rules, GameMap::new(12, 12, desert), &["Rome", "Carthage", "Sparta"])
    }

    #[test]
    fn healing_ranks_are_strictly_ordered() {
        let mut world = world();
        world.set_war(CivId(0), CivId(1), true);
        let own_city = Hex::new(2, 2);
        world.add_city("Rome", CivId(0), own_city).expect("city");
        world.add_city("Sparta", CivId(2), Hex::new(8, 2)).expect("city");
        world.add_city("Carthage", CivId(1), Hex::new(8, 8)).expect("city");
        let unit = world
            .spawn_unit_named("warrior", CivId(0), Hex::new(5, 5))
            .expect("spawn");

        assert_eq!(healing_rank(&world, unit, own_city), HealingRank::OwnCity);
        assert_eq!(healing_rank(&world, unit, Hex::new(3, 2)), HealingRank::Friendly);
        assert_eq!(healing_rank(&world, unit, Hex::new(9, 2)), HealingRank::Friendly);
        assert_eq!(healing_rank(&world, unit, Hex::new(5, 5)), HealingRank::Unowned);
        assert_eq!(healing_rank(&world, unit, Hex::new(9, 8)), HealingRank::Hostile);
        assert!(HealingRank::OwnCity > HealingRank::Friendly);
        assert!(HealingRank::Friendly > HealingRank::Unowned);
        assert!(HealingRank::Unowned > HealingRank::Hostile);
    }

    #[test]
    fn city_site_sums_best_five_with_two_outer_picks() {
        let mut world = world();
        let rules = world.rules().clone();
        let grassland = rules.terrain_id("grassland").expect("grassland");
        let coast = rules.terrain_id("coast").expect("coast");
        let center = Hex::new(5, 5);

        // Every ring-2 tile is worth 2; ring 1 is desert.
        for hex in center.ring(2) {
            world.map_mut().get_mut(hex).unwrap().terrain = grassland;
        }
        let config = AutomationConfig::default();
        let rankings = rank_tiles_around(&world, &YieldTileValuer, center, 7, CivId(0));
        assert_eq!(rank_tile_as_city_center(&world, center, &rankings, &config), 4.0);

        world.map_mut().get_mut(center + Hex::DIRECTIONS[0]).unwrap().terrain = coast;
        let rankings = rank_tiles_around(&world, &YieldTileValuer, center, 7, CivId(0));
        // coast yields 2, plus the coastal bonus
        assert_eq!(rank_tile_as_city_center(&world, center, &rankings, &config), 11.0);
    }
}
