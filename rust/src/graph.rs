//! Validated task graph with an adjacency index.
//!
//! Task IDs are mapped to dense indices in input order, so every
//! per-task vector downstream is indexed the same way and iteration is
//! reproducible across runs.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::diagnostics::ScheduleWarning;
use crate::models::{group_by_trade, Dependency, Task, Trade};

/// Dense task index (position in the input task list).
pub type TaskIdx = usize;

/// Input problems that must stop a compute pass before it starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task at position {0} has an empty ID")]
    EmptyTaskId(usize),
    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),
    #[error("Task {task_id} has duration {duration_days}; durations must be at least 1 day")]
    InvalidDuration { task_id: String, duration_days: i64 },
    #[error("Dependency {predecessor_id} -> {successor_id} has negative lag {lag_days}")]
    NegativeLag {
        predecessor_id: String,
        successor_id: String,
        lag_days: i64,
    },
}

/// A resolved finish-to-start edge between two tasks in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub predecessor: TaskIdx,
    pub successor: TaskIdx,
    pub lag_days: i64,
}

/// Tasks plus resolved edges, scoped to one compute pass.
#[derive(Debug)]
pub struct TaskGraph<'a> {
    tasks: Vec<&'a Task>,
    index: FxHashMap<&'a str, TaskIdx>,
    edges: Vec<Edge>,
    /// Per task: (predecessor, lag), in edge insertion order.
    predecessors: Vec<Vec<(TaskIdx, i64)>>,
    /// Per task: (successor, lag), in edge insertion order.
    successors: Vec<Vec<(TaskIdx, i64)>>,
    warnings: Vec<ScheduleWarning>,
}

impl<'a> TaskGraph<'a> {
    /// Validate tasks and resolve every edge.
    ///
    /// Edges come from each task's predecessor list (lag 0) followed by
    /// the explicit dependency records. Dangling and self-referencing
    /// edges are pruned with a warning; a repeated pair is merged and
    /// keeps its largest lag.
    pub fn build(tasks: &'a [Task], dependencies: &[Dependency]) -> Result<Self, ValidationError> {
        let mut index: FxHashMap<&'a str, TaskIdx> =
            FxHashMap::with_capacity_and_hasher(tasks.len(), Default::default());

        for (i, task) in tasks.iter().enumerate() {
            if task.id.is_empty() {
                return Err(ValidationError::EmptyTaskId(i));
            }
            if task.duration_days < 1 {
                return Err(ValidationError::InvalidDuration {
                    task_id: task.id.clone(),
                    duration_days: task.duration_days,
                });
            }
            if index.insert(task.id.as_str(), i).is_some() {
                return Err(ValidationError::DuplicateTaskId(task.id.clone()));
            }
        }

        for dep in dependencies {
            if dep.lag_days < 0 {
                return Err(ValidationError::NegativeLag {
                    predecessor_id: dep.predecessor_id.clone(),
                    successor_id: dep.successor_id.clone(),
                    lag_days: dep.lag_days,
                });
            }
        }

        let mut graph = Self {
            tasks: tasks.iter().collect(),
            index,
            edges: Vec::new(),
            predecessors: vec![Vec::new(); tasks.len()],
            successors: vec![Vec::new(); tasks.len()],
            warnings: Vec::new(),
        };

        // (pred, succ) -> (position in edges, came from an explicit record)
        let mut seen: FxHashMap<(TaskIdx, TaskIdx), (usize, bool)> = FxHashMap::default();

        for task in tasks {
            for pred_id in &task.dependencies {
                graph.add_edge(pred_id, &task.id, 0, false, &mut seen);
            }
        }
        for dep in dependencies {
            graph.add_edge(
                &dep.predecessor_id,
                &dep.successor_id,
                dep.lag_days,
                true,
                &mut seen,
            );
        }

        for edge in &graph.edges {
            graph.predecessors[edge.successor].push((edge.predecessor, edge.lag_days));
            graph.successors[edge.predecessor].push((edge.successor, edge.lag_days));
        }

        Ok(graph)
    }

    fn add_edge(
        &mut self,
        predecessor_id: &str,
        successor_id: &str,
        lag_days: i64,
        explicit: bool,
        seen: &mut FxHashMap<(TaskIdx, TaskIdx), (usize, bool)>,
    ) {
        let pred = self.index.get(predecessor_id).copied();
        let succ = self.index.get(successor_id).copied();
        let (pred, succ) = match (pred, succ) {
            (Some(p), Some(s)) => (p, s),
            (None, _) => {
                self.warn_dangling(predecessor_id, successor_id, predecessor_id);
                return;
            }
            (_, None) => {
                self.warn_dangling(predecessor_id, successor_id, successor_id);
                return;
            }
        };

        if pred == succ {
            self.warnings.push(ScheduleWarning::SelfDependency {
                task_id: predecessor_id.to_string(),
            });
            return;
        }

        match seen.get_mut(&(pred, succ)) {
            Some((position, was_explicit)) => {
                if explicit && *was_explicit {
                    self.warnings.push(ScheduleWarning::DuplicateDependency {
                        predecessor_id: predecessor_id.to_string(),
                        successor_id: successor_id.to_string(),
                    });
                }
                *was_explicit |= explicit;
                let edge = &mut self.edges[*position];
                edge.lag_days = edge.lag_days.max(lag_days);
            }
            None => {
                seen.insert((pred, succ), (self.edges.len(), explicit));
                self.edges.push(Edge {
                    predecessor: pred,
                    successor: succ,
                    lag_days,
                });
            }
        }
    }

    fn warn_dangling(&mut self, predecessor_id: &str, successor_id: &str, missing_id: &str) {
        self.warnings.push(ScheduleWarning::DanglingDependency {
            predecessor_id: predecessor_id.to_string(),
            successor_id: successor_id.to_string(),
            missing_id: missing_id.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline]
    pub fn task(&self, idx: TaskIdx) -> &'a Task {
        self.tasks[idx]
    }

    #[inline]
    pub fn index_of(&self, id: &str) -> Option<TaskIdx> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.index_of(id).map(|idx| self.tasks[idx])
    }

    #[inline]
    pub fn duration(&self, idx: TaskIdx) -> i64 {
        self.tasks[idx].duration_days
    }

    #[inline]
    pub fn predecessors(&self, idx: TaskIdx) -> &[(TaskIdx, i64)] {
        &self.predecessors[idx]
    }

    #[inline]
    pub fn successors(&self, idx: TaskIdx) -> &[(TaskIdx, i64)] {
        &self.successors[idx]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Tasks grouped by trade, in canonical trade order; input order within a trade.
    pub fn tasks_by_trade(&self) -> Vec<(Trade, Vec<&'a Task>)> {
        group_by_trade(self.tasks.iter().copied(), |task| task.trade)
    }

    /// Upper bound on any finish time: every duration plus every lag.
    /// None on overflow.
    pub fn horizon(&self) -> Option<i64> {
        let durations = self
            .tasks
            .iter()
            .try_fold(0i64, |acc, task| acc.checked_add(task.duration_days))?;
        self.edges
            .iter()
            .try_fold(durations, |acc, edge| acc.checked_add(edge.lag_days))
    }

    pub fn warnings(&self) -> &[ScheduleWarning] {
        &self.warnings
    }
}
