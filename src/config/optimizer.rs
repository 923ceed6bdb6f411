//! Optimizer defaults

use serde::Deserialize;

use crate::domain::scheduling::OptimiseTopicsConfig;

/// Defaults for optimize requests that do not carry their own options.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct OptimizerConfig {
    /// Also place topics without a room or slot
    #[serde(default)]
    pub optimise_unassigned_topics: bool,

    /// Repair owner double-bookings
    #[serde(default = "default_rectify_conflicts")]
    pub rectify_conflicts: bool,
}

fn default_rectify_conflicts() -> bool {
    true
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            optimise_unassigned_topics: false,
            rectify_conflicts: default_rectify_conflicts(),
        }
    }
}

impl From<OptimizerConfig> for OptimiseTopicsConfig {
    fn from(config: OptimizerConfig) -> Self {
        Self {
            optimise_unassigned_topics: config.optimise_unassigned_topics,
            rectify_conflicts: config.rectify_conflicts,
        }
    }
}
