use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hex::Hex;
use crate::ids::CivId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Civilization {
    pub id: CivId,
    pub name: String,
    pub gold: i32,
    pub techs: BTreeSet<String>,
    pub explored: BTreeSet<Hex>,
}

impl Civilization {
    pub fn new(id: CivId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            gold: 0,
            techs: BTreeSet::new(),
            explored: BTreeSet::new(),
        }
    }

    pub fn has_tech(&self, tech: &str) -> bool {
        self.techs.contains(tech)
    }

    pub fn has_explored(&self, hex: Hex) -> bool {
        self.explored.contains(&hex)
    }
}

/// Symmetric at-war matrix.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Diplomacy {
    civ_count: usize,
    at_war: Vec<bool>,
}

impl Diplomacy {
    pub fn new(civ_count: usize) -> Self {
        Self {
            civ_count,
            at_war: vec![false; civ_count * civ_count],
        }
    }

    fn idx(&self, a: CivId, b: CivId) -> Option<usize> {
        let n = self.civ_count;
        let (ai, bi) = (a.index(), b.index());
        (ai < n && bi < n).then_some(ai * n + bi)
    }

    pub fn is_at_war(&self, a: CivId, b: CivId) -> bool {
        a != b
            && self
                .idx(a, b)
                .and_then(|i| self.at_war.get(i).copied())
                .unwrap_or(false)
    }

    pub fn set_war(&mut self, a: CivId, b: CivId, at_war: bool) {
        if a == b {
            return;
        }
        for i in [self.idx(a, b), self.idx(b, a)].into_iter().flatten() {
            self.at_war[i] = at_war;
        }
    }

    pub fn any_war(&self, a: CivId) -> bool {
        (0..self.civ_count).any(|i| self.is_at_war(a, CivId(i as u8)))
    }

    pub fn enemies_of(&self, a: CivId) -> Vec<CivId> {
        (0..self.civ_count)
            .map(|i| CivId(i as u8))
            .filter(|&other| self.is_at_war(a, other))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn war_is_symmetric_and_never_with_self() {
        let mut d = Diplomacy::new(3);
        d.set_war(CivId(0), CivId(2), true);
        assert!(d.is_at_war(CivId(2), CivId(0)));
        assert!(!d.is_at_war(CivId(0), CivId(1)));
        d.set_war(CivId(1), CivId(1), true);
        assert!(!d.any_war(CivId(1)));
        assert_eq!(d.enemies_of(CivId(0)), vec![CivId(2)]);
    }

    #[test]
    fn unknown_civs_are_at_peace() {
        let d = Diplomacy::new(2);
        assert!(!d.is_at_war(CivId(0), CivId(9)));
    }
}
