//! The compute pass: validate, order, schedule, extract, derive.

use chrono::{Days, NaiveDate};
use pyo3::prelude::*;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::{CyclePolicy, EngineConfig};
use crate::critical_path::{extract_critical_path, TaskTiming};
use crate::diagnostics::ScheduleWarning;
use crate::graph::{TaskGraph, ValidationError};
use crate::milestones::derive_milestones;
use crate::models::{Dependency, Schedule, ScheduleStatus, Task};
use crate::ordering::topological_order;
use crate::strategy::{
    ForwardPass, PrecedenceSolver, SchedulingStrategy, SolveStatus, StartTimes, StrategyKind,
};
use crate::{log_passes, log_warn};

/// Errors that stop a compute pass before any dates are produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Circular dependency among tasks: {0:?}")]
    CircularDependency(Vec<String>),
    #[error("Invalid solver time limit: {0} seconds")]
    InvalidTimeLimit(f64),
    #[error("Schedule horizon of {horizon_days} day(s) from {start_date} exceeds the date range")]
    DateOutOfRange {
        start_date: NaiveDate,
        horizon_days: i64,
    },
}

/// A fully computed schedule plus how it was computed.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComputedSchedule {
    #[pyo3(get)]
    pub schedule: Schedule,
    /// Per-task timing in execution order.
    #[pyo3(get)]
    pub timings: Vec<TaskTiming>,
    pub strategy: StrategyKind,
    /// Terminal solver status; None when the solver was bypassed.
    pub solver_status: Option<SolveStatus>,
    pub warnings: Vec<ScheduleWarning>,
}

impl ComputedSchedule {
    pub fn timing(&self, task_id: &str) -> Option<&TaskTiming> {
        self.timings.iter().find(|t| t.task_id == task_id)
    }
}

#[pymethods]
impl ComputedSchedule {
    #[getter(strategy)]
    fn py_strategy(&self) -> &'static str {
        self.strategy.as_str()
    }

    #[getter(solver_status)]
    fn py_solver_status(&self) -> Option<&'static str> {
        self.solver_status.map(SolveStatus::as_str)
    }

    #[getter(warnings)]
    fn py_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "ComputedSchedule(id={:?}, total_duration_days={}, critical={}, warnings={})",
            self.schedule.id,
            self.schedule.total_duration_days,
            self.schedule.critical_path.len(),
            self.warnings.len()
        )
    }
}

fn offset_date(start: NaiveDate, days: i64) -> Result<NaiveDate, EngineError> {
    u64::try_from(days)
        .ok()
        .and_then(|days| start.checked_add_days(Days::new(days)))
        .ok_or(EngineError::DateOutOfRange {
            start_date: start,
            horizon_days: days,
        })
}

/// Every computed finish lies within the graph horizon.
fn check_horizon(graph: &TaskGraph<'_>, start: NaiveDate) -> Result<(), EngineError> {
    match graph.horizon() {
        Some(horizon) => offset_date(start, horizon).map(|_| ()),
        None => Err(EngineError::DateOutOfRange {
            start_date: start,
            horizon_days: i64::MAX,
        }),
    }
}

/// Run one compute pass over an immutable schedule snapshot.
///
/// The input is never modified. The returned schedule is `Complete`,
/// with every task's dates and critical flag filled in, dependencies
/// normalized to the resolved edge set, and milestones re-derived
/// against `today`.
pub fn compute_schedule(
    input: &Schedule,
    config: &EngineConfig,
    today: NaiveDate,
) -> Result<ComputedSchedule, EngineError> {
    let verbosity = config.verbosity;
    let time_limit = Duration::try_from_secs_f64(config.solver_time_limit_secs)
        .map_err(|_| EngineError::InvalidTimeLimit(config.solver_time_limit_secs))?;

    let graph = TaskGraph::build(&input.tasks, &input.dependencies)?;
    check_horizon(&graph, input.start_date)?;
    let mut warnings: Vec<ScheduleWarning> = graph.warnings().to_vec();
    for warning in &warnings {
        log_warn!(verbosity, "{}", warning);
    }

    let order = topological_order(&graph);
    if !order.is_acyclic() {
        let task_ids: Vec<String> = order
            .cyclic
            .iter()
            .map(|&idx| graph.task(idx).id.clone())
            .collect();
        if config.cycle_policy == CyclePolicy::Reject {
            return Err(EngineError::CircularDependency(task_ids));
        }
        let warning = ScheduleWarning::CyclicTasks { task_ids };
        log_warn!(verbosity, "{}", warning);
        warnings.push(warning);
    }
    log_passes!(
        verbosity,
        "Ordered {} task(s), {} edge(s), {} cyclic",
        graph.len(),
        graph.edges().len(),
        order.cyclic.len()
    );

    let fallback = ForwardPass::new(verbosity);
    let (strategy, solver_status, times): (StrategyKind, Option<SolveStatus>, StartTimes) =
        if config.use_solver {
            let solver = PrecedenceSolver::new(time_limit, verbosity);
            let outcome = solver.solve(&graph, &order);
            let status = outcome.status;
            match outcome.into_usable() {
                Some(times) => (solver.kind(), Some(status), times),
                None => {
                    let warning = ScheduleWarning::SolverFallback { status };
                    log_warn!(verbosity, "{}", warning);
                    warnings.push(warning);
                    (fallback.kind(), Some(status), fallback.run(&graph, &order))
                }
            }
        } else {
            log_passes!(verbosity, "Solver bypassed, using forward pass");
            (fallback.kind(), None, fallback.run(&graph, &order))
        };
    log_passes!(
        verbosity,
        "Scheduled with {:?} (solver status {:?}), makespan {} day(s)",
        strategy,
        solver_status,
        times.makespan
    );

    let extracted = extract_critical_path(&graph, &order, &times);
    log_passes!(
        verbosity,
        "Critical path: {} of {} task(s)",
        extracted.critical_path.len(),
        graph.len()
    );

    let mut tasks: Vec<Task> = Vec::with_capacity(graph.len());
    for (idx, task) in input.tasks.iter().enumerate() {
        let timing = &extracted.timings[idx];
        let dependencies: Vec<String> = graph
            .predecessors(idx)
            .iter()
            .map(|&(pred, _)| graph.task(pred).id.clone())
            .collect();
        tasks.push(Task {
            start_date: Some(offset_date(input.start_date, timing.earliest_start)?),
            end_date: Some(offset_date(input.start_date, timing.earliest_finish)?),
            dependencies,
            is_critical: timing.is_critical(),
            ..task.clone()
        });
    }

    let dependencies: Vec<Dependency> = graph
        .edges()
        .iter()
        .map(|e| {
            Dependency::new(
                graph.task(e.predecessor).id.clone(),
                graph.task(e.successor).id.clone(),
                e.lag_days,
            )
        })
        .collect();

    let critical_path: Vec<String> = extracted
        .critical_path
        .iter()
        .map(|&idx| graph.task(idx).id.clone())
        .collect();

    let timings: Vec<TaskTiming> = order
        .order
        .iter()
        .map(|&idx| extracted.timings[idx].clone())
        .collect();

    let end_date = offset_date(input.start_date, extracted.total_duration)?;
    let milestones = derive_milestones(&input.milestones, &tasks, today);

    let schedule = Schedule {
        status: ScheduleStatus::Complete,
        tasks,
        dependencies,
        milestones,
        critical_path,
        total_duration_days: extracted.total_duration,
        end_date: Some(end_date),
        ..input.clone()
    };

    Ok(ComputedSchedule {
        schedule,
        timings,
        strategy,
        solver_status,
        warnings,
    })
}
