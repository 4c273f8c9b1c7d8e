//! Projects tasks onto calendar days.
//!
//! A task spreads its estimated effort evenly over every day between its start date and its deadline (both included).
//! This module computes that per-day share, the calendar entries it yields (see [`calendar`]),
//! and progress aggregates over sets of tasks (see [`aggregate`]).
//!
//! Everything here is a pure function of the tasks and of "today": calling again is all it takes to refresh a view.

pub mod aggregate;
pub mod calendar;

use chrono::NaiveDate;

use crate::Task;

pub use aggregate::{aggregate, HoursSummary, Progress, ProgressBand};
pub use calendar::{events_for_task, events_for_task_from, CalendarEntry, EntryStyle, TaskDays};


/// Number of days from `start` to `deadline`, both included.
///
/// Returns `None` when `deadline` is before `start`: such tasks must be skipped.
pub fn date_range_length(start: NaiveDate, deadline: NaiveDate) -> Option<i64> {
    if deadline < start {
        return None;
    }
    Some((deadline - start).num_days() + 1)
}

/// Share of `estimated_hours` that falls on each day of a range of `range_length` days
pub fn hours_per_day(estimated_hours: f64, range_length: i64) -> f64 {
    estimated_hours.max(0.0) / range_length.max(1) as f64
}

/// The hours of `task` attributed to each of its days.
///
/// Tasks without a start date start `today`.
/// Returns `None` for tasks whose deadline is before their start date.
pub fn daily_hours(task: &Task, today: NaiveDate) -> Option<f64> {
    let range_length = date_range_length(task.effective_start(today), task.deadline())?;
    Some(hours_per_day(task.estimated_hours(), range_length))
}

/// Whether the deadline of `task` has not passed yet
pub fn is_valid(task: &Task, today: NaiveDate) -> bool {
    task.deadline() >= today
}

/// Whether `today` is within the date range of `task`.
///
/// Tasks without a start date are never scheduled today: only the calendar places them from today on.
pub fn is_scheduled_today(task: &Task, today: NaiveDate) -> bool {
    match task.start_date() {
        None => false,
        Some(start) => start <= today && today <= task.deadline(),
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{TaskId, TaskType, DATE_FORMAT};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn task(start: Option<&str>, deadline: &str, hours: f64) -> Task {
        Task::new(TaskId::Remote(1), "Calculus".to_string(), TaskType::Subject,
                  start.map(date), date(deadline), hours, 2)
    }

    #[test]
    fn test_date_range_length() {
        assert_eq!(date_range_length(date("2026-10-16"), date("2026-10-16")), Some(1));
        assert_eq!(date_range_length(date("2026-10-16"), date("2026-10-18")), Some(3));
        assert_eq!(date_range_length(date("2026-12-30"), date("2027-01-02")), Some(4));
        assert_eq!(date_range_length(date("2026-10-18"), date("2026-10-16")), None);
    }

    #[test]
    fn test_daily_hours() {
        let today = date("2026-10-16");
        assert_eq!(daily_hours(&task(Some("2026-10-16"), "2026-10-18", 9.0), today), Some(3.0));
        assert_eq!(daily_hours(&task(Some("2026-10-18"), "2026-10-16", 9.0), today), None);
        // no start date: the range starts today
        assert_eq!(daily_hours(&task(None, "2026-10-17", 5.0), today), Some(2.5));
        assert_eq!(hours_per_day(4.0, 0), 4.0);
    }

    #[test]
    fn test_daily_hours_sum_to_estimate() {
        let today = date("2026-10-01");
        for (deadline, hours) in &[("2026-10-01", 1.0), ("2026-10-07", 10.0), ("2026-11-13", 37.5)] {
            let t = task(Some("2026-10-01"), deadline, *hours);
            let days = date_range_length(date("2026-10-01"), date(deadline)).unwrap();
            let per_day = daily_hours(&t, today).unwrap();
            assert!((per_day * days as f64 - hours).abs() < 1e-9);
        }
    }

    #[test]
    fn test_filters() {
        let today = date("2026-10-16");
        let current = task(Some("2026-10-10"), "2026-10-20", 1.0);
        let future = task(Some("2026-10-18"), "2026-10-20", 1.0);
        let expired = task(Some("2026-10-01"), "2026-10-15", 1.0);

        assert!(is_valid(&current, today));
        assert!(is_valid(&future, today));
        assert!(is_valid(&expired, today) == false);

        assert!(is_scheduled_today(&current, today));
        assert!(is_scheduled_today(&future, today) == false);
        assert!(is_scheduled_today(&expired, today) == false);
        assert!(is_scheduled_today(&task(None, "2026-10-16", 1.0), today) == false);
        assert!(is_scheduled_today(&task(None, "2026-10-20", 5.0), today) == false);
    }
}
