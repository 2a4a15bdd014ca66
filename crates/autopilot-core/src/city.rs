use serde::{Deserialize, Serialize};

use crate::hex::Hex;
use crate::ids::CivId;

pub const DEFAULT_CITY_HEALTH: i32 = 200;
pub const DEFAULT_CITY_STRENGTH: i32 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub owner: CivId,
    pub position: Hex,
    pub health: i32,
    pub max_health: i32,
    pub strength: i32,
}

impl City {
    pub fn new(name: impl Into<String>, owner: CivId, position: Hex) -> Self {
        Self {
            name: name.into(),
            owner,
            position,
            health: DEFAULT_CITY_HEALTH,
            max_health: DEFAULT_CITY_HEALTH,
            strength: DEFAULT_CITY_STRENGTH,
        }
    }

    /// A city at 1 health falls to the next melee attack.
    pub fn is_capturable(&self) -> bool {
        self.health == 1
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }
}
