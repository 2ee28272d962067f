//! Classical CPM forward pass.

use crate::graph::TaskGraph;
use crate::log_debug;
use crate::ordering::TopologicalOrder;

use super::{SchedulingStrategy, SolveStatus, StartTimes, StrategyKind, StrategyOutcome};

/// Direct forward-pass computation: ES = max(EF(pred) + lag), EF = ES + duration.
///
/// Minimal by construction on an acyclic graph. In a cyclic tail a
/// predecessor placed later in the order has no finish time yet and is
/// skipped, so those dates are plausible but not guaranteed minimal.
#[derive(Clone, Debug, Default)]
pub struct ForwardPass {
    pub verbosity: u8,
}

impl ForwardPass {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    pub fn run(&self, graph: &TaskGraph<'_>, order: &TopologicalOrder) -> StartTimes {
        let n = graph.len();
        let mut earliest_start = vec![0i64; n];
        let mut earliest_finish: Vec<Option<i64>> = vec![None; n];
        let mut makespan = 0i64;

        for &idx in &order.order {
            let mut start = 0i64;
            for &(pred, lag) in graph.predecessors(idx) {
                if let Some(pred_finish) = earliest_finish[pred] {
                    start = start.max(pred_finish.saturating_add(lag));
                }
            }
            let finish = start.saturating_add(graph.duration(idx));
            earliest_start[idx] = start;
            earliest_finish[idx] = Some(finish);
            makespan = makespan.max(finish);

            log_debug!(
                self.verbosity,
                "  forward {}: es={} ef={}",
                graph.task(idx).id,
                start,
                finish
            );
        }

        StartTimes {
            earliest_start,
            makespan,
        }
    }
}

impl SchedulingStrategy for ForwardPass {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ForwardPass
    }

    fn solve(&self, graph: &TaskGraph<'_>, order: &TopologicalOrder) -> StrategyOutcome {
        let status = if order.is_acyclic() {
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        };
        StrategyOutcome {
            status,
            solution: Some(self.run(graph, order)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependency, Task, Trade};
    use crate::ordering::topological_order;

    fn make_task(id: &str, duration: i64, deps: &[&str]) -> Task {
        Task::planned(id, Trade::Flooring, duration, deps)
    }

    fn solve(tasks: &[Task], deps: &[Dependency]) -> StrategyOutcome {
        let graph = TaskGraph::build(tasks, deps).unwrap();
        let order = topological_order(&graph);
        ForwardPass::default().solve(&graph, &order)
    }

    #[test]
    fn test_linear_chain() {
        let tasks = vec![
            make_task("a", 3, &[]),
            make_task("b", 2, &["a"]),
            make_task("c", 4, &["b"]),
        ];
        let outcome = solve(&tasks, &[]);

        assert_eq!(outcome.status, SolveStatus::Optimal);
        let times = outcome.solution.unwrap();
        assert_eq!(times.earliest_start, vec![0, 3, 5]);
        assert_eq!(times.makespan, 9);
    }

    #[test]
    fn test_diamond() {
        let tasks = vec![
            make_task("a", 2, &[]),
            make_task("b", 5, &["a"]),
            make_task("c", 1, &["a"]),
            make_task("d", 1, &["b", "c"]),
        ];
        let times = solve(&tasks, &[]).solution.unwrap();

        assert_eq!(times.earliest_start, vec![0, 2, 2, 7]);
        assert_eq!(times.makespan, 8);
    }

    #[test]
    fn test_lag_delays_successor() {
        // a (2d) -[3d lag]-> b (1d)
        let tasks = vec![make_task("a", 2, &[]), make_task("b", 1, &[])];
        let deps = vec![Dependency::new("a".to_string(), "b".to_string(), 3)];
        let times = solve(&tasks, &deps).solution.unwrap();

        assert_eq!(times.earliest_start, vec![0, 5]);
        assert_eq!(times.makespan, 6);
    }

    #[test]
    fn test_empty_set_has_zero_makespan() {
        let outcome = solve(&[], &[]);
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.solution.unwrap().makespan, 0);
    }

    #[test]
    fn test_cycle_is_feasible_not_optimal() {
        let tasks = vec![make_task("a", 2, &["b"]), make_task("b", 3, &["a"])];
        let outcome = solve(&tasks, &[]);

        assert_eq!(outcome.status, SolveStatus::Feasible);
        let times = outcome.solution.unwrap();
        // a first in the tail (no finished preds), then b after a
        assert_eq!(times.earliest_start, vec![0, 2]);
        assert_eq!(times.makespan, 5);
    }
}
