//! Read-only timeline view of a computed schedule.

use chrono::NaiveDate;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::models::{group_by_trade, MilestoneStatus, Schedule, TaskStatus, Trade};

/// One timeline bar. `start` and `end` are both inclusive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GanttBar {
    pub id: String,
    pub name: String,
    pub trade: Trade,
    pub room_id: Option<String>,
    pub status: TaskStatus,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration_days: i64,
    pub progress: f64,
    pub dependencies: Vec<String>,
    pub is_critical: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GanttLink {
    pub id: String,
    pub source: String,
    pub target: String,
    pub lag_days: i64,
    /// Both ends on the critical path.
    pub is_critical: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GanttMilestone {
    pub id: String,
    pub name: String,
    /// Actual date when reached, target date otherwise.
    pub date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: MilestoneStatus,
    pub trade: Option<Trade>,
}

/// Collapsible group summary for one trade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TradeGroup {
    pub trade: Trade,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub task_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleProjection {
    pub schedule_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub total_duration_days: i64,
    pub critical_path: Vec<String>,
    pub bars: Vec<GanttBar>,
    pub links: Vec<GanttLink>,
    pub milestones: Vec<GanttMilestone>,
    /// In canonical trade order.
    pub trade_groups: Vec<TradeGroup>,
}

/// Build the timeline view. Tasks without computed dates get no bar.
pub fn project_schedule(schedule: &Schedule) -> ScheduleProjection {
    let mut predecessors: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    for dep in &schedule.dependencies {
        predecessors
            .entry(dep.successor_id.as_str())
            .or_default()
            .push(dep.predecessor_id.clone());
    }

    let mut bars: Vec<GanttBar> = Vec::with_capacity(schedule.tasks.len());
    for task in &schedule.tasks {
        let (Some(start), Some(end)) = (task.start_date, task.end_date) else {
            continue;
        };
        let last_day = end.pred_opt().filter(|d| *d >= start).unwrap_or(start);
        bars.push(GanttBar {
            id: task.id.clone(),
            name: task.name.clone(),
            trade: task.trade,
            room_id: task.room_id.clone(),
            status: task.status,
            start,
            end: last_day,
            duration_days: task.duration_days,
            progress: task.status.progress(),
            dependencies: predecessors.remove(task.id.as_str()).unwrap_or_default(),
            is_critical: task.is_critical,
        });
    }

    let on_timeline: FxHashSet<&str> = bars.iter().map(|b| b.id.as_str()).collect();
    let critical: FxHashSet<&str> = schedule.critical_path.iter().map(|s| s.as_str()).collect();
    let links: Vec<GanttLink> = schedule
        .dependencies
        .iter()
        .filter(|dep| {
            on_timeline.contains(dep.predecessor_id.as_str())
                && on_timeline.contains(dep.successor_id.as_str())
        })
        .map(|dep| GanttLink {
            id: format!("{}->{}", dep.predecessor_id, dep.successor_id),
            source: dep.predecessor_id.clone(),
            target: dep.successor_id.clone(),
            lag_days: dep.lag_days,
            is_critical: critical.contains(dep.predecessor_id.as_str())
                && critical.contains(dep.successor_id.as_str()),
        })
        .collect();

    let milestones: Vec<GanttMilestone> = schedule
        .milestones
        .iter()
        .map(|m| GanttMilestone {
            id: m.id.clone(),
            name: m.name.clone(),
            date: m.actual_date.unwrap_or(m.target_date),
            target_date: m.target_date,
            status: m.status,
            trade: m.trade,
        })
        .collect();

    let trade_groups: Vec<TradeGroup> = group_by_trade(&bars, |bar| bar.trade)
        .into_iter()
        .filter_map(|(trade, members)| {
            Some(TradeGroup {
                trade,
                label: trade.label().to_string(),
                start: members.iter().map(|b| b.start).min()?,
                end: members.iter().map(|b| b.end).max()?,
                task_ids: members.iter().map(|b| b.id.clone()).collect(),
            })
        })
        .collect();

    ScheduleProjection {
        schedule_id: schedule.id.clone(),
        name: schedule.name.clone(),
        start_date: schedule.start_date,
        end_date: schedule.end_date,
        total_duration_days: schedule.total_duration_days,
        critical_path: schedule.critical_path.clone(),
        bars,
        links,
        milestones,
        trade_groups,
    }
}
