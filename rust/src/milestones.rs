//! Milestone status derivation.
//!
//! Status is a pure function of task status and the current date, so it
//! is recomputed on every read rather than stored as a one-time decision.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::models::{Milestone, MilestoneStatus, Task, TaskStatus};

/// Derive (status, actual_date) for one milestone.
///
/// - every associated task completed: `Reached`, keeping an existing
///   actual date or stamping `today`
/// - otherwise, past the target date: `Missed`
/// - otherwise: `Pending`
///
/// A task ID with no status (not in the schedule) counts as not completed.
/// Milestones under manual override keep whatever the caller set.
pub fn derive_milestone_status<F>(
    milestone: &Milestone,
    task_status: F,
    today: NaiveDate,
) -> (MilestoneStatus, Option<NaiveDate>)
where
    F: Fn(&str) -> Option<TaskStatus>,
{
    if milestone.manual_override {
        return (milestone.status, milestone.actual_date);
    }

    let all_complete = milestone
        .task_ids
        .iter()
        .all(|id| task_status(id) == Some(TaskStatus::Completed));

    if all_complete {
        (
            MilestoneStatus::Reached,
            Some(milestone.actual_date.unwrap_or(today)),
        )
    } else if today > milestone.target_date {
        (MilestoneStatus::Missed, None)
    } else {
        (MilestoneStatus::Pending, None)
    }
}

/// Re-derive every milestone against the current task set.
pub fn derive_milestones(
    milestones: &[Milestone],
    tasks: &[Task],
    today: NaiveDate,
) -> Vec<Milestone> {
    let statuses: FxHashMap<&str, TaskStatus> =
        tasks.iter().map(|t| (t.id.as_str(), t.status)).collect();

    milestones
        .iter()
        .map(|milestone| {
            let (status, actual_date) =
                derive_milestone_status(milestone, |id| statuses.get(id).copied(), today);
            Milestone {
                status,
                actual_date,
                ..milestone.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trade;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn task_with_status(id: &str, status: TaskStatus) -> Task {
        Task {
            status,
            ..Task::planned(id, Trade::Cleanup, 1, &[])
        }
    }

    #[test]
    fn test_all_completed_past_target_is_reached() {
        let tasks = vec![
            task_with_status("a", TaskStatus::Completed),
            task_with_status("b", TaskStatus::Completed),
        ];
        let milestones = vec![Milestone::tracking("handover", d(2025, 3, 1), &["a", "b"])];

        let derived = derive_milestones(&milestones, &tasks, d(2025, 3, 10));
        assert_eq!(derived[0].status, MilestoneStatus::Reached);
        assert_eq!(derived[0].actual_date, Some(d(2025, 3, 10)));
    }

    #[test]
    fn test_reached_keeps_existing_actual_date() {
        let tasks = vec![task_with_status("a", TaskStatus::Completed)];
        let mut milestone = Milestone::tracking("m", d(2025, 3, 1), &["a"]);
        milestone.actual_date = Some(d(2025, 2, 27));

        let derived = derive_milestones(&[milestone], &tasks, d(2025, 3, 10));
        assert_eq!(derived[0].actual_date, Some(d(2025, 2, 27)));
    }

    #[test]
    fn test_incomplete_past_target_is_missed() {
        let tasks = vec![
            task_with_status("a", TaskStatus::Completed),
            task_with_status("b", TaskStatus::InProgress),
        ];
        let milestones = vec![Milestone::tracking("handover", d(2025, 3, 1), &["a", "b"])];

        let derived = derive_milestones(&milestones, &tasks, d(2025, 3, 10));
        assert_eq!(derived[0].status, MilestoneStatus::Missed);
        assert_eq!(derived[0].actual_date, None);
    }

    #[test]
    fn test_incomplete_on_target_day_is_pending() {
        let tasks = vec![task_with_status("a", TaskStatus::Delayed)];
        let milestones = vec![Milestone::tracking("m", d(2025, 3, 1), &["a"])];

        let derived = derive_milestones(&milestones, &tasks, d(2025, 3, 1));
        assert_eq!(derived[0].status, MilestoneStatus::Pending);
    }

    #[test]
    fn test_unknown_task_counts_as_incomplete() {
        let tasks = vec![task_with_status("a", TaskStatus::Completed)];
        let milestones = vec![Milestone::tracking("m", d(2025, 3, 1), &["a", "ghost"])];

        let derived = derive_milestones(&milestones, &tasks, d(2025, 3, 2));
        assert_eq!(derived[0].status, MilestoneStatus::Missed);
    }

    #[test]
    fn test_manual_override_is_left_alone() {
        let mut milestone = Milestone::tracking("m", d(2025, 3, 1), &["a"]);
        milestone.manual_override = true;
        milestone.status = MilestoneStatus::Reached;
        milestone.actual_date = Some(d(2025, 2, 1));

        let tasks = vec![task_with_status("a", TaskStatus::NotStarted)];
        let derived = derive_milestones(&[milestone.clone()], &tasks, d(2025, 4, 1));
        assert_eq!(derived[0], milestone);
    }

    #[test]
    fn test_reevaluates_as_tasks_complete() {
        let milestone = Milestone::tracking("m", d(2025, 3, 1), &["a"]);
        let today = d(2025, 2, 20);

        let before = derive_milestones(
            &[milestone.clone()],
            &[task_with_status("a", TaskStatus::InProgress)],
            today,
        );
        assert_eq!(before[0].status, MilestoneStatus::Pending);

        let after = derive_milestones(
            &before,
            &[task_with_status("a", TaskStatus::Completed)],
            today,
        );
        assert_eq!(after[0].status, MilestoneStatus::Reached);
    }
}
