use core::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use autopilot_core::{Hex, UnitId, World};

use crate::range::{to_milli, MILLI_PER_MOVE};
use crate::{MovementRange, Navigator};

/// Cost of a step between two road tiles.
pub const ROAD_STEP_MILLI: u32 = MILLI_PER_MOVE / 3;

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    hex: Hex,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Hex, u64) {
        (self.f, self.g, self.hex, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Dijkstra/A* navigator over the world's hex map.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexNavigator;

impl HexNavigator {
    pub fn new() -> Self {
        Self
    }

    fn step_cost(world: &World, from: Hex, to: Hex) -> u32 {
        let (Some(a), Some(b)) = (world.tile(from), world.tile(to)) else {
            return u32::MAX;
        };
        if a.road && b.road {
            return ROAD_STEP_MILLI;
        }
        world.rules().terrain(b.terrain).move_cost * MILLI_PER_MOVE
    }
}

impl Navigator for HexNavigator {
    fn movement_range(&self, world: &World, unit: UnitId) -> MovementRange {
        let Some(u) = world.unit(unit) else {
            return MovementRange::new(Hex::default(), 0);
        };
        let origin = u.position;
        let budget = to_milli(u.movement);
        let mut range = MovementRange::new(origin, budget);
        if budget == 0 {
            return range;
        }

        let mut best: BTreeMap<Hex, u32> = BTreeMap::new();
        best.insert(origin, 0);
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;
        open.push(OpenNode {
            f: 0,
            g: 0,
            hex: origin,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if best.get(&node.hex).copied() != Some(node.g) {
                // Stale heap entry.
                continue;
            }
            if node.g >= budget {
                continue;
            }
            for n in world.map().neighbors(node.hex) {
                if !world.can_pass_through(unit, n) {
                    continue;
                }
                // A unit with movement left can always take one more step.
                let g = node
                    .g
                    .saturating_add(Self::step_cost(world, node.hex, n))
                    .min(budget);
                if best.get(&n).is_some_and(|&known| g >= known) {
                    continue;
                }
                best.insert(n, g);
                open.push(OpenNode {
                    f: g,
                    g,
                    hex: n,
                    tie,
                });
                tie += 1;
            }
        }

        for (hex, cost) in best {
            range.insert(hex, cost);
        }
        range
    }

    fn shortest_path(&self, world: &World, unit: UnitId, to: Hex) -> Vec<Hex> {
        let Some(u) = world.unit(unit) else {
            return Vec::new();
        };
        let start = u.position;
        if start == to || !world.map().contains(to) || !world.can_enter_terrain(unit, to) {
            return Vec::new();
        }

        let heuristic = |hex: Hex| hex.distance(to) as u32 * ROAD_STEP_MILLI;
        let mut g_score: BTreeMap<Hex, u32> = BTreeMap::new();
        let mut came_from: BTreeMap<Hex, Hex> = BTreeMap::new();
        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        g_score.insert(start, 0);
        open.push(OpenNode {
            f: heuristic(start),
            g: 0,
            hex: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.hex == to {
                let mut path = vec![to];
                let mut current = to;
                while let Some(prev) = came_from.get(&current).copied() {
                    if prev == start {
                        break;
                    }
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return path;
            }
            if g_score.get(&node.hex).copied() != Some(node.g) {
                continue;
            }

            for n in world.map().neighbors(node.hex) {
                // The destination may hold a city or units; the route to it may not.
                let enterable = if n == to {
                    world.can_enter_terrain(unit, n)
                } else {
                    world.can_pass_through(unit, n)
                };
                if !enterable {
                    continue;
                }
                let g = node.g.saturating_add(Self::step_cost(world, node.hex, n));
                if g_score.get(&n).is_some_and(|&known| g >= known) {
                    continue;
                }
                g_score.insert(n, g);
                came_from.insert(n, node.hex);
                open.push(OpenNode {
                    f: g.saturating_add(heuristic(n)),
                    g,
                    hex: n,
                    tie,
                });
                tie += 1;
            }
        }

        Vec::new()
    }
}
