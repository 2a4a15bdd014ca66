use serde::{Deserialize, Serialize};

use crate::hex::Hex;
use crate::ids::{CityId, CivId, ResourceId, TerrainId, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Improvement {
    AncientRuins,
    FishingBoats,
    Farm,
    Mine,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainId,
    pub resource: Option<ResourceId>,
    pub improvement: Option<Improvement>,
    #[serde(default)]
    pub road: bool,
    pub owner: Option<CivId>,
    /// Set on city center tiles only.
    pub city: Option<CityId>,
    pub military_unit: Option<UnitId>,
    pub civilian_unit: Option<UnitId>,
}

impl Tile {
    pub fn new(terrain: TerrainId) -> Self {
        Self {
            terrain,
            resource: None,
            improvement: None,
            road: false,
            owner: None,
            city: None,
            military_unit: None,
            civilian_unit: None,
        }
    }

    pub fn is_city_center(&self) -> bool {
        self.city.is_some()
    }

    pub fn units(&self) -> impl Iterator<Item = UnitId> {
        self.military_unit.into_iter().chain(self.civilian_unit)
    }
}

/// Rectangular axial map without wrapping: `0 <= q < width`, `0 <= r < height`.
#[derive(Clone, Debug)]
pub struct GameMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl GameMap {
    pub fn new(width: u32, height: u32, default_terrain: TerrainId) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::new(default_terrain); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.index_of(hex).is_some()
    }

    pub fn index_of(&self, hex: Hex) -> Option<usize> {
        if hex.q < 0 || hex.r < 0 || hex.q >= self.width as i32 || hex.r >= self.height as i32 {
            return None;
        }
        Some((hex.r as usize) * (self.width as usize) + (hex.q as usize))
    }

    pub fn hex_at_index(&self, index: usize) -> Option<Hex> {
        if index >= self.tiles.len() {
            return None;
        }
        let q = (index % self.width as usize) as i32;
        let r = (index / self.width as usize) as i32;
        Some(Hex::new(q, r))
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.index_of(hex).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, hex: Hex) -> Option<&mut Tile> {
        self.index_of(hex).map(move |i| &mut self.tiles[i])
    }

    /// Every hex on the map in row-major order.
    pub fn hexes(&self) -> impl Iterator<Item = Hex> + '_ {
        (0..self.tiles.len()).filter_map(|i| self.hex_at_index(i))
    }

    pub fn neighbors(&self, hex: Hex) -> impl Iterator<Item = Hex> + '_ {
        hex.neighbors().into_iter().filter(|n| self.contains(*n))
    }

    /// On-map hexes within `radius`, nearest ring first.
    pub fn tiles_in_distance(&self, center: Hex, radius: i32) -> Vec<Hex> {
        center
            .spiral(radius)
            .into_iter()
            .filter(|h| self.contains(*h))
            .collect()
    }

    /// On-map hexes exactly `radius` away.
    pub fn tiles_at_distance(&self, center: Hex, radius: i32) -> Vec<Hex> {
        center
            .ring(radius)
            .into_iter()
            .filter(|h| self.contains(*h))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_bounds_without_wrap() {
        let map = GameMap::new(4, 3, TerrainId::new(0));
        assert_eq!(map.len(), 12);
        assert!(map.contains(Hex::new(3, 2)));
        assert!(!map.contains(Hex::new(4, 0)));
        assert!(!map.contains(Hex::new(-1, 0)));
        assert_eq!(map.hex_at_index(5), Some(Hex::new(1, 1)));
        assert_eq!(map.index_of(Hex::new(1, 1)), Some(5));
    }

    #[test]
    fn distance_queries_clip_to_map() {
        let map = GameMap::new(5, 5, TerrainId::new(0));
        let corner = Hex::new(0, 0);
        assert_eq!(map.tiles_in_distance(corner, 0), vec![corner]);
        // (1, 0) and (0, 1).
        assert_eq!(map.tiles_at_distance(corner, 1).len(), 2);
        assert!(map
            .tiles_in_distance(corner, 2)
            .iter()
            .all(|h| map.contains(*h) && h.distance(corner) <= 2));
    }
}
