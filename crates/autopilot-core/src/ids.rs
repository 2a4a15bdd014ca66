use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Dense rules-table index, compiled from the string keys of the YAML ruleset.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId<T> {
    pub raw: u16,
    #[serde(skip)]
    _marker: PhantomData<fn() -> T>,
}

impl<T> RuleId<T> {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.raw as usize
    }
}

// Manual impls: derives would put bounds on the tag type.
impl<T> Clone for RuleId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RuleId<T> {}

impl<T> PartialEq for RuleId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for RuleId<T> {}

impl<T> PartialOrd for RuleId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RuleId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> std::hash::Hash for RuleId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for RuleId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

#[derive(Debug)]
pub enum TerrainTag {}
#[derive(Debug)]
pub enum ResourceTag {}
#[derive(Debug)]
pub enum UnitKindTag {}

pub type TerrainId = RuleId<TerrainTag>;
pub type ResourceId = RuleId<ResourceTag>;
pub type UnitKindId = RuleId<UnitKindTag>;

/// Index of a civilization in `World::civs`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CivId(pub u8);

impl CivId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle into an `EntityStore`: slot index plus the generation it was issued for.
pub trait EntityKey: Copy + Ord + fmt::Debug {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(self) -> u32;
    fn generation(self) -> u32;

    fn to_raw(self) -> u64 {
        ((self.index() as u64) << 32) | self.generation() as u64
    }
}

macro_rules! entity_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name {
            pub index: u32,
            pub generation: u32,
        }

        impl EntityKey for $name {
            #[inline]
            fn from_parts(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            #[inline]
            fn index(self) -> u32 {
                self.index
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}v{}", self.index, self.generation)
            }
        }
    };
}

entity_key!(
    /// A unit on the map.
    UnitId
);
entity_key!(
    /// A city on the map.
    CityId
);
