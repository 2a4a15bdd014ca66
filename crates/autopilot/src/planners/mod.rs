//! The specialised planners the decision policy delegates to.

pub mod advance;
pub mod attack;
pub mod exploration;
pub mod garrison;
pub mod healing;
pub mod settlement;
pub mod support;

pub use advance::{try_advance_towards_close_enemy, try_head_towards_enemy_city};
pub use attack::{attackable_enemies, choose_attack, contains_attackable_enemy, try_attack, AttackableTile};
pub use exploration::{automated_explore, explore, try_go_to_ruin};
pub use garrison::try_garrison;
pub use healing::{best_healing_tile, heal_unit};
pub use settlement::{automate_settler, has_escort, rank_city_sites};
pub use support::{automate_work_boats, try_accompany_settler, try_upgrade};
