//! Critical-path engine for construction schedules.
//!
//! Takes trade-grouped tasks with finish-to-start dependencies and
//! computes start/end dates, per-task float, the critical path and
//! milestone status. Earliest starts come from a time-budgeted
//! precedence solver, with a CPM forward pass as the fallback.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{Local, NaiveDate};
use pyo3::prelude::*;

mod config;
pub mod critical_path;
mod diagnostics;
pub mod engine;
pub mod graph;
pub mod logging;
pub mod milestones;
mod models;
pub mod ordering;
pub mod projection;
pub mod strategy;

pub use config::{CyclePolicy, EngineConfig, DEFAULT_SOLVER_TIME_LIMIT_SECS};
pub use critical_path::{extract_critical_path, CriticalPathResult, TaskTiming};
pub use diagnostics::ScheduleWarning;
pub use engine::{compute_schedule, ComputedSchedule, EngineError};
pub use graph::{Edge, TaskGraph, TaskIdx, ValidationError};
pub use milestones::{derive_milestone_status, derive_milestones};
pub use models::{
    Dependency, Milestone, MilestoneStatus, Schedule, ScheduleStatus, Task, TaskStatus, Trade,
};
pub use ordering::{topological_order, TopologicalOrder};
pub use projection::{project_schedule, ScheduleProjection};
pub use strategy::{
    ForwardPass, PrecedenceSolver, SchedulingStrategy, SolveStatus, StartTimes, StrategyKind,
    StrategyOutcome,
};

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

/// Compute dates, float and the critical path for a schedule.
///
/// # Arguments
/// * `schedule` - Schedule snapshot; it is not modified
/// * `config` - Engine configuration (defaults when omitted)
/// * `today` - Date used for milestone status (local date when omitted)
///
/// # Raises
/// * ValueError on invalid input (bad duration or lag, duplicate IDs,
///   a cycle under the reject policy)
#[pyfunction]
#[pyo3(name = "compute_schedule", signature = (schedule, config=None, today=None))]
fn py_compute_schedule(
    schedule: Schedule,
    config: Option<EngineConfig>,
    today: Option<NaiveDate>,
) -> PyResult<ComputedSchedule> {
    let config = config.unwrap_or_default();
    compute_schedule(&schedule, &config, today_or_local(today))
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Re-derive milestone status against current task status.
#[pyfunction]
#[pyo3(name = "derive_milestones", signature = (milestones, tasks, today=None))]
fn py_derive_milestones(
    milestones: Vec<Milestone>,
    tasks: Vec<Task>,
    today: Option<NaiveDate>,
) -> Vec<Milestone> {
    derive_milestones(&milestones, &tasks, today_or_local(today))
}

/// Timeline projection of a computed schedule, as a JSON string.
#[pyfunction]
fn project_schedule_json(schedule: Schedule) -> PyResult<String> {
    serde_json::to_string(&project_schedule(&schedule))
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The schedule_engine Python module.
#[pymodule]
fn schedule_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<Trade>()?;
    m.add_class::<TaskStatus>()?;
    m.add_class::<MilestoneStatus>()?;
    m.add_class::<ScheduleStatus>()?;
    m.add_class::<Task>()?;
    m.add_class::<Dependency>()?;
    m.add_class::<Milestone>()?;
    m.add_class::<Schedule>()?;
    m.add_class::<TaskTiming>()?;
    m.add_class::<ComputedSchedule>()?;

    // Config types
    m.add_class::<EngineConfig>()?;
    m.add_class::<CyclePolicy>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_compute_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_derive_milestones, m)?)?;
    m.add_function(wrap_pyfunction!(project_schedule_json, m)?)?;

    Ok(())
}
