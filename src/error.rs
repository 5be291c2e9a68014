//! Errors raised while validating a scheduler configuration or workload.
use thiserror::Error;

use crate::types::job::JobId;

/// Rejection of a configuration or workload. Raised before any simulation
/// step runs; a run that fails here produces no results.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("at least one priority level is required")]
    NoLevels,

    #[error("quantum for level {level} must be positive")]
    ZeroQuantum { level: usize },

    #[error("allotment for level {level} must be positive")]
    ZeroAllotment { level: usize },

    #[error("{what} has {got} entries but {expected} levels are configured")]
    LevelCountMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("boost interval must be positive")]
    ZeroBoostInterval,

    #[error("job {job} has no service time")]
    ZeroServiceTime { job: JobId },

    #[error("invalid scenario: {0}")]
    Scenario(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
