use std::fmt;

use serde::{Deserialize, Serialize};

/// Axial hex coordinate. The cube coordinate `s` is derived as `-q - r`.
///
/// `Ord` is lexicographic on `(q, r)`; every ordered collection of tiles in the
/// workspace relies on it for reproducible iteration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    /// Neighbour offsets, starting east and turning counter-clockwise.
    pub const DIRECTIONS: [Hex; 6] = [
        Hex::new(1, 0),
        Hex::new(1, -1),
        Hex::new(0, -1),
        Hex::new(-1, 0),
        Hex::new(-1, 1),
        Hex::new(0, 1),
    ];

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn neighbors(self) -> [Hex; 6] {
        Self::DIRECTIONS.map(|d| self + d)
    }

    #[inline]
    pub fn distance(self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    pub fn is_adjacent(self, other: Hex) -> bool {
        self.distance(other) == 1
    }

    /// Hexes at exactly `radius` steps, walking the ring from its south-west corner.
    ///
    /// `ring(0)` is the hex itself.
    pub fn ring(self, radius: i32) -> Vec<Hex> {
        if radius < 0 {
            return Vec::new();
        }
        if radius == 0 {
            return vec![self];
        }

        let mut out = Vec::with_capacity(6 * radius as usize);
        let mut cursor = self + Self::DIRECTIONS[4] * radius;
        for direction in Self::DIRECTIONS {
            for _ in 0..radius {
                out.push(cursor);
                cursor = cursor + direction;
            }
        }
        out
    }

    /// Hexes within `radius` steps, nearest ring first.
    pub fn spiral(self, radius: i32) -> Vec<Hex> {
        (0..=radius.max(0)).flat_map(|r| self.ring(r)).collect()
    }
}

impl std::ops::Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }
}

impl std::ops::Sub for Hex {
    type Output = Hex;

    fn sub(self, other: Hex) -> Hex {
        Hex::new(self.q - other.q, self.r - other.r)
    }
}

impl std::ops::Mul<i32> for Hex {
    type Output = Hex;

    fn mul(self, k: i32) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_cube_based() {
        let a = Hex::new(0, 0);
        let b = Hex::new(3, -1);
        assert_eq!(a.distance(b), 3);
        assert_eq!(b.distance(a), 3);
        assert_eq!(Hex::new(2, 2).distance(Hex::new(0, 0)), 4);
    }

    #[test]
    fn ring_has_six_times_radius_members_at_that_distance() {
        let center = Hex::new(4, 7);
        for radius in 1..=5 {
            let ring = center.ring(radius);
            assert_eq!(ring.len(), 6 * radius as usize);
            assert!(ring.iter().all(|h| h.distance(center) == radius));
        }
    }

    #[test]
    fn spiral_is_ordered_by_distance() {
        let center = Hex::new(0, 0);
        let spiral = center.spiral(3);
        assert_eq!(spiral.len(), 1 + 3 * 3 * 4);
        assert_eq!(spiral[0], center);
        assert!(spiral
            .windows(2)
            .all(|w| w[0].distance(center) <= w[1].distance(center)));
    }

    #[test]
    fn neighbors_are_adjacent() {
        let center = Hex::new(1, 1);
        assert!(center.neighbors().iter().all(|n| n.is_adjacent(center)));
    }
}
