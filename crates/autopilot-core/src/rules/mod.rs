mod loader;
mod types;

pub use loader::{embedded_rules, load_rules, RulesError, RulesSource};
pub use types::*;
