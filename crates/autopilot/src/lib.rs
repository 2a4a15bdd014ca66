//! Turn-by-turn automation for units: a role dispatch and a priority chain of
//! planners for combat, garrisons, healing, settling and exploration.

#![forbid(unsafe_code)]

pub mod actions;
pub mod combat;
pub mod config;
pub mod context;
pub mod error;
pub mod planners;
pub mod policy;
pub mod ranker;

pub use actions::{
    try_action, ActionCatalog, StandardActionCatalog, UnitAction, UnitCommand, CREATE_FISHING_BOATS,
    FORTIFY_PREFIX, FOUND_CITY, SET_UP, UPGRADE_PREFIX,
};
pub use combat::{AttackOutcome, CombatResolver, Combatant, StrengthCombatResolver};
pub use config::AutomationConfig;
pub use context::{AutomationContext, IdleWorkers, Services, UnitTurn, WorkerAutomation};
pub use error::{ActionError, AutomationError, ConfigError};
pub use planners::AttackableTile;
pub use policy::{default_chain, Outcome, Rule, UnitAutomation};
pub use ranker::{
    healing_rank, rank_tile_as_city_center, rank_tiles_around, HealingRank, TileValuer,
    YieldTileValuer,
};
