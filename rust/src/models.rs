//! Core data types for construction schedules.

use chrono::NaiveDate;
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

/// Construction trade, declared in canonical execution order.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    Demolition,
    Civil,
    PlumbingRoughIn,
    ElectricalRoughIn,
    FalseCeiling,
    Flooring,
    Carpentry,
    Painting,
    MepFixtures,
    SoftFurnishing,
    Cleanup,
}

impl Trade {
    /// All trades in execution order.
    pub const ALL: [Trade; 11] = [
        Trade::Demolition,
        Trade::Civil,
        Trade::PlumbingRoughIn,
        Trade::ElectricalRoughIn,
        Trade::FalseCeiling,
        Trade::Flooring,
        Trade::Carpentry,
        Trade::Painting,
        Trade::MepFixtures,
        Trade::SoftFurnishing,
        Trade::Cleanup,
    ];

    /// Zero-based position in the canonical execution order.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Trade::Demolition => "Demolition",
            Trade::Civil => "Civil Work",
            Trade::PlumbingRoughIn => "Plumbing Rough-in",
            Trade::ElectricalRoughIn => "Electrical Rough-in",
            Trade::FalseCeiling => "False Ceiling",
            Trade::Flooring => "Flooring",
            Trade::Carpentry => "Carpentry",
            Trade::Painting => "Painting",
            Trade::MepFixtures => "MEP Fixtures",
            Trade::SoftFurnishing => "Soft Furnishing",
            Trade::Cleanup => "Cleanup",
        }
    }
}

/// Bucket items by trade in canonical trade order, keeping input order
/// within a trade. Trades with no items are left out.
pub fn group_by_trade<I, T, F>(items: I, trade_of: F) -> Vec<(Trade, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Trade,
{
    let mut buckets: Vec<Vec<T>> = Trade::ALL.iter().map(|_| Vec::new()).collect();
    for item in items {
        buckets[trade_of(&item).position()].push(item);
    }
    Trade::ALL
        .into_iter()
        .zip(buckets)
        .filter(|(_, bucket)| !bucket.is_empty())
        .collect()
}

#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    Blocked,
}

impl TaskStatus {
    /// Display progress fraction for a task in this state.
    pub fn progress(self) -> f64 {
        match self {
            TaskStatus::NotStarted => 0.0,
            TaskStatus::InProgress => 0.5,
            TaskStatus::Completed => 1.0,
            TaskStatus::Delayed => 0.3,
            TaskStatus::Blocked => 0.0,
        }
    }
}

#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    Reached,
    Missed,
}

#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Generating,
    Complete,
    Failed,
}

/// A finish-to-start edge: `successor.start >= predecessor.end + lag_days`.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[pyo3(get, set)]
    pub predecessor_id: String,
    #[pyo3(get, set)]
    pub successor_id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub lag_days: i64,
}

#[pymethods]
impl Dependency {
    #[new]
    #[pyo3(signature = (predecessor_id, successor_id, lag_days=0))]
    pub fn new(predecessor_id: String, successor_id: String, lag_days: i64) -> Self {
        Self {
            predecessor_id,
            successor_id,
            lag_days,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Dependency({:?} -> {:?}, lag_days={})",
            self.predecessor_id, self.successor_id, self.lag_days
        )
    }
}

/// A unit of work.
///
/// `start_date`, `end_date` and `is_critical` are computed; the planner
/// leaves them empty and the engine fills them on the returned copy.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub schedule_id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub room_id: Option<String>,
    #[pyo3(get, set)]
    pub trade: Trade,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub description: String,
    #[pyo3(get, set)]
    pub duration_days: i64,
    #[pyo3(get, set)]
    #[serde(default)]
    pub status: TaskStatus,
    #[pyo3(get, set)]
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Exclusive: the first day after the task's last working day.
    #[pyo3(get, set)]
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Predecessor task IDs.
    #[pyo3(get, set)]
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[pyo3(get)]
    #[serde(default)]
    pub is_critical: bool,
}

impl Task {
    /// A task as emitted by the planner: nothing computed yet.
    pub fn planned(id: &str, trade: Trade, duration_days: i64, dependencies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            schedule_id: String::new(),
            room_id: None,
            trade,
            name: id.to_string(),
            description: String::new(),
            duration_days,
            status: TaskStatus::NotStarted,
            start_date: None,
            end_date: None,
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            estimated_cost: None,
            is_critical: false,
        }
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (
        id,
        trade,
        name,
        duration_days,
        dependencies=Vec::new(),
        status=TaskStatus::NotStarted,
        schedule_id=String::new(),
        room_id=None,
        description=String::new(),
        estimated_cost=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        id: String,
        trade: Trade,
        name: String,
        duration_days: i64,
        dependencies: Vec<String>,
        status: TaskStatus,
        schedule_id: String,
        room_id: Option<String>,
        description: String,
        estimated_cost: Option<f64>,
    ) -> Self {
        Self {
            id,
            schedule_id,
            room_id,
            trade,
            name,
            description,
            duration_days,
            status,
            start_date: None,
            end_date: None,
            dependencies,
            estimated_cost,
            is_critical: false,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, trade={:?}, duration_days={}, deps={})",
            self.id,
            self.trade,
            self.duration_days,
            self.dependencies.len()
        )
    }
}

/// A checkpoint reached when all of its tasks complete.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub schedule_id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub description: String,
    #[pyo3(get, set)]
    pub target_date: NaiveDate,
    #[pyo3(get, set)]
    #[serde(default)]
    pub actual_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub status: MilestoneStatus,
    #[pyo3(get, set)]
    #[serde(default)]
    pub trade: Option<Trade>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub task_ids: Vec<String>,
    /// Set by callers who edited status/actual date by hand; the
    /// deriver leaves such milestones untouched.
    #[pyo3(get, set)]
    #[serde(default)]
    pub manual_override: bool,
}

impl Milestone {
    pub fn tracking(id: &str, target_date: NaiveDate, task_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            schedule_id: String::new(),
            name: id.to_string(),
            description: String::new(),
            target_date,
            actual_date: None,
            status: MilestoneStatus::Pending,
            trade: None,
            task_ids: task_ids.iter().map(|t| t.to_string()).collect(),
            manual_override: false,
        }
    }
}

#[pymethods]
impl Milestone {
    #[new]
    #[pyo3(signature = (
        id,
        name,
        target_date,
        task_ids=Vec::new(),
        trade=None,
        schedule_id=String::new(),
        description=String::new(),
        actual_date=None,
        status=MilestoneStatus::Pending,
        manual_override=false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        id: String,
        name: String,
        target_date: NaiveDate,
        task_ids: Vec<String>,
        trade: Option<Trade>,
        schedule_id: String,
        description: String,
        actual_date: Option<NaiveDate>,
        status: MilestoneStatus,
        manual_override: bool,
    ) -> Self {
        Self {
            id,
            schedule_id,
            name,
            description,
            target_date,
            actual_date,
            status,
            trade,
            task_ids,
            manual_override,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Milestone(id={:?}, target={}, status={:?}, tasks={})",
            self.id,
            self.target_date,
            self.status,
            self.task_ids.len()
        )
    }
}

/// The aggregate root handed to and returned from the engine.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub project_id: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub name: String,
    #[pyo3(get, set)]
    #[serde(default)]
    pub status: ScheduleStatus,
    #[pyo3(get, set)]
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[pyo3(get, set)]
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Zero-float task IDs in execution order.
    #[pyo3(get)]
    #[serde(default)]
    pub critical_path: Vec<String>,
    #[pyo3(get)]
    #[serde(default)]
    pub total_duration_days: i64,
    #[pyo3(get, set)]
    pub start_date: NaiveDate,
    #[pyo3(get)]
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Schedule {
    pub fn pending(id: &str, start_date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self {
            id: id.to_string(),
            project_id: String::new(),
            name: id.to_string(),
            status: ScheduleStatus::Pending,
            tasks,
            dependencies: Vec::new(),
            milestones: Vec::new(),
            critical_path: Vec::new(),
            total_duration_days: 0,
            start_date,
            end_date: None,
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

#[pymethods]
impl Schedule {
    #[new]
    #[pyo3(signature = (
        id,
        start_date,
        tasks=Vec::new(),
        dependencies=Vec::new(),
        milestones=Vec::new(),
        project_id=String::new(),
        name=String::new()
    ))]
    fn py_new(
        id: String,
        start_date: NaiveDate,
        tasks: Vec<Task>,
        dependencies: Vec<Dependency>,
        milestones: Vec<Milestone>,
        project_id: String,
        name: String,
    ) -> Self {
        Self {
            id,
            project_id,
            name,
            status: ScheduleStatus::Pending,
            tasks,
            dependencies,
            milestones,
            critical_path: Vec::new(),
            total_duration_days: 0,
            start_date,
            end_date: None,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Schedule(id={:?}, status={:?}, tasks={}, total_duration_days={})",
            self.id,
            self.status,
            self.tasks.len(),
            self.total_duration_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trades_declared_in_execution_order() {
        for (i, trade) in Trade::ALL.iter().enumerate() {
            assert_eq!(trade.position(), i);
        }
        assert!(Trade::Demolition < Trade::Cleanup);
        assert!(Trade::PlumbingRoughIn < Trade::ElectricalRoughIn);
    }

    #[test]
    fn test_group_by_trade_skips_empty_trades() {
        let items = vec![
            ("trim", Trade::Painting),
            ("wall", Trade::Civil),
            ("walls", Trade::Painting),
        ];
        let groups = group_by_trade(items, |&(_, trade)| trade);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], (Trade::Civil, vec![("wall", Trade::Civil)]));
        assert_eq!(groups[1].0, Trade::Painting);
        let names: Vec<&str> = groups[1].1.iter().map(|&(name, _)| name).collect();
        assert_eq!(names, vec!["trim", "walls"]);
    }

    #[test]
    fn test_progress_by_status() {
        assert_eq!(TaskStatus::NotStarted.progress(), 0.0);
        assert_eq!(TaskStatus::InProgress.progress(), 0.5);
        assert_eq!(TaskStatus::Completed.progress(), 1.0);
        assert_eq!(TaskStatus::Delayed.progress(), 0.3);
        assert_eq!(TaskStatus::Blocked.progress(), 0.0);
    }

    #[test]
    fn test_planned_task_has_nothing_computed() {
        let task = Task::planned("paint", Trade::Painting, 3, &["ceiling"]);
        assert_eq!(task.dependencies, vec!["ceiling".to_string()]);
        assert!(task.start_date.is_none());
        assert!(task.end_date.is_none());
        assert!(!task.is_critical);
    }

    #[test]
    fn test_task_deserializes_with_defaults() {
        let json = r#"{
            "id": "t1",
            "trade": "plumbing_rough_in",
            "name": "Kitchen plumbing",
            "duration_days": 2
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.trade, Trade::PlumbingRoughIn);
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert!(task.dependencies.is_empty());
        assert!(!task.is_critical);
    }
}
