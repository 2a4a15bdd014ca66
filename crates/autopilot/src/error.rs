use autopilot_core::{UnitId, WorldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("action {action:?} is not available to unit {unit}")]
    NotAvailable { unit: UnitId, action: String },
    #[error(transparent)]
    World(#[from] WorldError),
}

/// A decision that could not complete. Not-applicable outcomes are never errors.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Action(#[from] ActionError),
}
