//! Earliest-start strategies.
//!
//! Both strategies answer the same question, the earliest start of every
//! task and the minimal makespan, and share one output shape so the
//! engine can swap one for the other.

mod forward_pass;
mod solver;

pub use forward_pass::ForwardPass;
pub use solver::PrecedenceSolver;

use serde::{Deserialize, Serialize};

use crate::graph::TaskGraph;
use crate::ordering::TopologicalOrder;

/// Terminal status of a strategy run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Solution proven minimal.
    Optimal,
    /// Solution found, optimality not proven (budget ran out, or cyclic tail).
    Feasible,
    /// The constraints admit no solution within the horizon.
    Infeasible,
    /// Budget ran out before any solution was found.
    Unknown,
    /// The model could not be built (horizon overflow).
    ModelInvalid,
}

impl SolveStatus {
    /// Same spelling as the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unknown => "unknown",
            SolveStatus::ModelInvalid => "model_invalid",
        }
    }
}

/// Which strategy produced the start times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Solver,
    ForwardPass,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Solver => "solver",
            StrategyKind::ForwardPass => "forward_pass",
        }
    }
}

/// Per-task earliest starts (days from schedule start, indexed by
/// `TaskIdx`) and the overall makespan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartTimes {
    pub earliest_start: Vec<i64>,
    pub makespan: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub status: SolveStatus,
    pub solution: Option<StartTimes>,
}

impl StrategyOutcome {
    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            solution: None,
        }
    }

    /// The solution, if the status says it can be trusted.
    pub fn usable(&self) -> Option<&StartTimes> {
        match self.status {
            SolveStatus::Optimal | SolveStatus::Feasible => self.solution.as_ref(),
            _ => None,
        }
    }

    pub fn into_usable(self) -> Option<StartTimes> {
        match self.status {
            SolveStatus::Optimal | SolveStatus::Feasible => self.solution,
            _ => None,
        }
    }
}

/// Computes earliest starts for a validated graph.
pub trait SchedulingStrategy {
    fn kind(&self) -> StrategyKind;

    fn solve(&self, graph: &TaskGraph<'_>, order: &TopologicalOrder) -> StrategyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_optimal_and_feasible_are_usable() {
        let times = StartTimes {
            earliest_start: vec![0],
            makespan: 1,
        };
        for (status, usable) in [
            (SolveStatus::Optimal, true),
            (SolveStatus::Feasible, true),
            (SolveStatus::Infeasible, false),
            (SolveStatus::Unknown, false),
            (SolveStatus::ModelInvalid, false),
        ] {
            let outcome = StrategyOutcome {
                status,
                solution: Some(times.clone()),
            };
            assert_eq!(outcome.usable().is_some(), usable, "{:?}", status);
        }
    }

    #[test]
    fn test_names_match_serialized_form() {
        for status in [
            SolveStatus::Optimal,
            SolveStatus::Feasible,
            SolveStatus::Infeasible,
            SolveStatus::Unknown,
            SolveStatus::ModelInvalid,
        ] {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
        }
        assert_eq!(SolveStatus::ModelInvalid.as_str(), "model_invalid");
        for kind in [StrategyKind::Solver, StrategyKind::ForwardPass] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }
}
