//! Non-fatal problems recorded during a compute pass.

use serde::Serialize;

use crate::strategy::SolveStatus;

/// A recovered data-quality problem or strategy switch.
///
/// None of these stop the pass; they ride along on the result so the
/// caller can surface them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleWarning {
    /// An edge referencing a task that isn't in the schedule. Dropped.
    DanglingDependency {
        predecessor_id: String,
        successor_id: String,
        missing_id: String,
    },
    /// A task listed as its own predecessor. Dropped.
    SelfDependency { task_id: String },
    /// The same explicit edge given more than once. Merged, largest lag kept.
    DuplicateDependency {
        predecessor_id: String,
        successor_id: String,
    },
    /// Tasks that could never reach zero in-degree, in input order.
    CyclicTasks { task_ids: Vec<String> },
    /// The solver produced no usable solution and the forward pass took over.
    SolverFallback { status: SolveStatus },
}

impl std::fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingDependency {
                predecessor_id,
                successor_id,
                missing_id,
            } => write!(
                f,
                "Dropped dependency {} -> {}: task {} not found",
                predecessor_id, successor_id, missing_id
            ),
            Self::SelfDependency { task_id } => {
                write!(f, "Dropped self-dependency on task {}", task_id)
            }
            Self::DuplicateDependency {
                predecessor_id,
                successor_id,
            } => write!(
                f,
                "Merged duplicate dependency {} -> {}",
                predecessor_id, successor_id
            ),
            Self::CyclicTasks { task_ids } => write!(
                f,
                "Circular dependency among {} task(s), appended in input order: {}",
                task_ids.len(),
                task_ids.join(", ")
            ),
            Self::SolverFallback { status } => write!(
                f,
                "Solver finished with status {:?}, using forward pass",
                status
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_missing_task() {
        let warning = ScheduleWarning::DanglingDependency {
            predecessor_id: "ghost".to_string(),
            successor_id: "paint".to_string(),
            missing_id: "ghost".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Dropped dependency ghost -> paint: task ghost not found"
        );
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let warning = ScheduleWarning::SolverFallback {
            status: SolveStatus::Unknown,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "solver_fallback");
        assert_eq!(json["status"], "unknown");
    }
}
