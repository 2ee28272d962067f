//! Backward pass, float, and critical-path extraction.

use pyo3::prelude::*;
use serde::Serialize;

use crate::graph::{TaskGraph, TaskIdx};
use crate::ordering::TopologicalOrder;
use crate::strategy::StartTimes;

/// Per-task timing, in whole days from the schedule start.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TaskTiming {
    #[pyo3(get)]
    pub task_id: String,
    /// Earliest possible start (forward pass).
    #[pyo3(get)]
    pub earliest_start: i64,
    #[pyo3(get)]
    pub earliest_finish: i64,
    /// Latest start that doesn't move the project end (backward pass).
    #[pyo3(get)]
    pub latest_start: i64,
    #[pyo3(get)]
    pub latest_finish: i64,
    /// max(0, latest_start - earliest_start).
    #[pyo3(get)]
    pub float_days: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.float_days == 0
    }
}

#[pymethods]
impl TaskTiming {
    fn __repr__(&self) -> String {
        format!(
            "TaskTiming(task_id={:?}, es={}, ls={}, float={})",
            self.task_id, self.earliest_start, self.latest_start, self.float_days
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CriticalPathResult {
    /// Indexed by `TaskIdx`.
    pub timings: Vec<TaskTiming>,
    /// Every zero-float task, in topological order.
    pub critical_path: Vec<TaskIdx>,
    pub total_duration: i64,
}

/// Run the backward pass over `order` reversed and pick out the zero-float tasks.
///
/// A task with no successors must finish by `total_duration`; otherwise
/// by the smallest `latest_start(successor) - lag`. A successor that has
/// no latest start yet (only possible inside a cyclic tail) is skipped.
/// Float is floored at zero so anomalies in a cyclic tail never read as
/// negative slack.
pub fn extract_critical_path(
    graph: &TaskGraph<'_>,
    order: &TopologicalOrder,
    times: &StartTimes,
) -> CriticalPathResult {
    let n = graph.len();
    let total_duration = times.makespan;
    let mut latest_start: Vec<Option<i64>> = vec![None; n];
    let mut timings: Vec<TaskTiming> = vec![TaskTiming::default(); n];

    for &idx in order.order.iter().rev() {
        let mut latest_finish = total_duration;
        for &(succ, lag) in graph.successors(idx) {
            if let Some(succ_start) = latest_start[succ] {
                latest_finish = latest_finish.min(succ_start.saturating_sub(lag));
            }
        }

        let duration = graph.duration(idx);
        let ls = latest_finish.saturating_sub(duration);
        latest_start[idx] = Some(ls);

        let es = times.earliest_start[idx];
        timings[idx] = TaskTiming {
            task_id: graph.task(idx).id.clone(),
            earliest_start: es,
            earliest_finish: es.saturating_add(duration),
            latest_start: ls,
            latest_finish,
            float_days: ls.saturating_sub(es).max(0),
        };
    }

    let critical_path: Vec<TaskIdx> = order
        .order
        .iter()
        .copied()
        .filter(|&idx| timings[idx].is_critical())
        .collect();

    CriticalPathResult {
        timings,
        critical_path,
        total_duration,
    }
}
