//! Time-budgeted minimum-makespan solver.
//!
//! Model: one integer start variable per task with domain
//! `[0, horizon - duration]`, a makespan variable in `[0, horizon]`,
//! `start[s] >= start[p] + duration[p] + lag` per edge, and
//! `makespan >= start[i] + duration[i]` per task. Bounds are propagated
//! to a fixpoint, the incumbent takes every variable's lower bound, and
//! optimality is proven by re-propagating with `makespan <= best - 1`
//! until the domains wipe out.

use std::time::{Duration, Instant};

use crate::graph::{Edge, TaskGraph};
use crate::log_debug;
use crate::ordering::TopologicalOrder;

use super::{SchedulingStrategy, SolveStatus, StartTimes, StrategyKind, StrategyOutcome};

#[derive(Clone, Debug)]
pub struct PrecedenceSolver {
    pub time_limit: Duration,
    pub verbosity: u8,
}

impl PrecedenceSolver {
    pub fn new(time_limit: Duration, verbosity: u8) -> Self {
        Self {
            time_limit,
            verbosity,
        }
    }
}

struct Model<'g> {
    durations: Vec<i64>,
    /// Edges sorted by predecessor position, so one sweep settles a DAG.
    edges: Vec<&'g Edge>,
    horizon: i64,
}

impl<'g> Model<'g> {
    /// None when the horizon overflows.
    fn build(graph: &'g TaskGraph<'_>, order: &TopologicalOrder) -> Option<Self> {
        let horizon = graph.horizon()?;
        let durations: Vec<i64> = (0..graph.len()).map(|idx| graph.duration(idx)).collect();

        let positions = order.positions();
        let mut edges: Vec<&Edge> = graph.edges().iter().collect();
        edges.sort_by_key(|e| (positions[e.predecessor], positions[e.successor]));

        Some(Self {
            durations,
            edges,
            horizon,
        })
    }
}

#[derive(Clone, Debug)]
struct Domains {
    start_lb: Vec<i64>,
    start_ub: Vec<i64>,
    makespan_lb: i64,
    makespan_ub: i64,
}

impl Domains {
    fn initial(model: &Model<'_>) -> Self {
        Self {
            start_lb: vec![0; model.durations.len()],
            start_ub: model.durations.iter().map(|d| model.horizon - d).collect(),
            makespan_lb: 0,
            makespan_ub: model.horizon,
        }
    }

    fn is_empty(&self) -> bool {
        self.makespan_lb > self.makespan_ub
            || self
                .start_lb
                .iter()
                .zip(&self.start_ub)
                .any(|(lb, ub)| lb > ub)
    }

    /// Min-value labeling: every start at its lower bound.
    fn label(&self, model: &Model<'_>) -> StartTimes {
        let makespan = self
            .start_lb
            .iter()
            .zip(&model.durations)
            .map(|(s, d)| s + d)
            .max()
            .unwrap_or(0);
        StartTimes {
            earliest_start: self.start_lb.clone(),
            makespan,
        }
    }
}

enum Propagation {
    Fixpoint,
    Wipeout,
    OutOfTime,
}

impl PrecedenceSolver {
    fn propagate(
        &self,
        model: &Model<'_>,
        dom: &mut Domains,
        deadline: Option<Instant>,
    ) -> Propagation {
        let mut sweeps = 0usize;
        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Propagation::OutOfTime;
            }
            sweeps += 1;
            let mut changed = false;

            for edge in &model.edges {
                let (p, s) = (edge.predecessor, edge.successor);
                let needed = dom.start_lb[p]
                    .saturating_add(model.durations[p])
                    .saturating_add(edge.lag_days);
                if needed > dom.start_lb[s] {
                    dom.start_lb[s] = needed;
                    changed = true;
                }
            }

            for (i, &d) in model.durations.iter().enumerate() {
                let end_lb = dom.start_lb[i].saturating_add(d);
                if end_lb > dom.makespan_lb {
                    dom.makespan_lb = end_lb;
                    changed = true;
                }
                let latest = dom.makespan_ub.saturating_sub(d);
                if latest < dom.start_ub[i] {
                    dom.start_ub[i] = latest;
                    changed = true;
                }
            }

            for edge in model.edges.iter().rev() {
                let (p, s) = (edge.predecessor, edge.successor);
                let allowed = dom.start_ub[s]
                    .saturating_sub(edge.lag_days)
                    .saturating_sub(model.durations[p]);
                if allowed < dom.start_ub[p] {
                    dom.start_ub[p] = allowed;
                    changed = true;
                }
            }

            if dom.is_empty() {
                log_debug!(self.verbosity, "  solver: wipeout after {} sweep(s)", sweeps);
                return Propagation::Wipeout;
            }
            if !changed {
                log_debug!(self.verbosity, "  solver: fixpoint after {} sweep(s)", sweeps);
                return Propagation::Fixpoint;
            }
        }
    }
}

impl SchedulingStrategy for PrecedenceSolver {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Solver
    }

    fn solve(&self, graph: &TaskGraph<'_>, order: &TopologicalOrder) -> StrategyOutcome {
        let deadline = Instant::now().checked_add(self.time_limit);

        let Some(model) = Model::build(graph, order) else {
            return StrategyOutcome::without_solution(SolveStatus::ModelInvalid);
        };
        log_debug!(
            self.verbosity,
            "  solver: {} vars, {} precedence constraints, horizon {}",
            model.durations.len(),
            model.edges.len(),
            model.horizon
        );

        let mut dom = Domains::initial(&model);
        match self.propagate(&model, &mut dom, deadline) {
            Propagation::Fixpoint => {}
            Propagation::Wipeout => {
                return StrategyOutcome::without_solution(SolveStatus::Infeasible);
            }
            Propagation::OutOfTime => {
                return StrategyOutcome::without_solution(SolveStatus::Unknown);
            }
        }

        let mut incumbent = dom.label(&model);

        loop {
            let mut tightened = dom.clone();
            tightened.makespan_ub = incumbent.makespan - 1;
            if tightened.is_empty() {
                break;
            }
            match self.propagate(&model, &mut tightened, deadline) {
                Propagation::Wipeout => break,
                Propagation::OutOfTime => {
                    return StrategyOutcome {
                        status: SolveStatus::Feasible,
                        solution: Some(incumbent),
                    };
                }
                Propagation::Fixpoint => {
                    incumbent = tightened.label(&model);
                    dom = tightened;
                }
            }
        }

        log_debug!(self.verbosity, "  solver: optimal makespan {}", incumbent.makespan);
        StrategyOutcome {
            status: SolveStatus::Optimal,
            solution: Some(incumbent),
        }
    }
}
