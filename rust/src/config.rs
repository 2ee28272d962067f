//! Configuration types for the compute pass.

use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::logging::VERBOSITY_WARNINGS;

/// Default wall-clock budget for the precedence solver.
pub const DEFAULT_SOLVER_TIME_LIMIT_SECS: f64 = 30.0;

/// What to do when the dependency graph contains a cycle.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Append the stalled tasks in input order and keep going.
    #[default]
    BestEffort,
    /// Fail validation with the list of tasks that could not be ordered.
    Reject,
}

/// Configuration for a compute pass.
#[pyclass]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Try the precedence solver before the forward pass.
    #[pyo3(get, set)]
    pub use_solver: bool,
    /// Wall-clock budget for the solver, in seconds.
    #[pyo3(get, set)]
    pub solver_time_limit_secs: f64,
    #[pyo3(get, set)]
    pub cycle_policy: CyclePolicy,
    /// Verbosity level: 0=silent, 1=warnings, 2=passes, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_solver: true,
            solver_time_limit_secs: DEFAULT_SOLVER_TIME_LIMIT_SECS,
            cycle_policy: CyclePolicy::BestEffort,
            verbosity: VERBOSITY_WARNINGS,
        }
    }
}

#[pymethods]
impl EngineConfig {
    #[new]
    #[pyo3(signature = (
        use_solver=None,
        solver_time_limit_secs=None,
        cycle_policy=None,
        verbosity=None
    ))]
    fn new(
        use_solver: Option<bool>,
        solver_time_limit_secs: Option<f64>,
        cycle_policy: Option<CyclePolicy>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            use_solver: use_solver.unwrap_or(defaults.use_solver),
            solver_time_limit_secs: solver_time_limit_secs
                .unwrap_or(defaults.solver_time_limit_secs),
            cycle_policy: cycle_policy.unwrap_or(defaults.cycle_policy),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig(use_solver={}, solver_time_limit_secs={}, cycle_policy={:?})",
            self.use_solver, self.solver_time_limit_secs, self.cycle_policy
        )
    }
}

impl EngineConfig {
    /// Config with the solver bypassed; only the forward pass runs.
    pub fn forward_pass_only() -> Self {
        Self {
            use_solver: false,
            ..Self::default()
        }
    }

    /// Silent config, used by tests and what-if reruns.
    pub fn quiet() -> Self {
        Self {
            verbosity: crate::logging::VERBOSITY_SILENT,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert!(config.use_solver);
        assert!((config.solver_time_limit_secs - 30.0).abs() < 1e-9);
        assert_eq!(config.cycle_policy, CyclePolicy::BestEffort);
        assert_eq!(config.verbosity, VERBOSITY_WARNINGS);
    }

    #[test]
    fn test_forward_pass_only_keeps_other_defaults() {
        let config = EngineConfig::forward_pass_only();
        assert!(!config.use_solver);
        assert_eq!(config.cycle_policy, CyclePolicy::BestEffort);
    }
}
