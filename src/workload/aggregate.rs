//! Progress aggregates over sets of tasks

use chrono::NaiveDate;
use serde::Serialize;

use crate::Task;
use super::{daily_hours, is_scheduled_today, is_valid};


/// Counts and hours of a set of tasks
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Progress {
    pub task_count: usize,
    pub completed_count: usize,
    pub total_hours: f64,
    pub completed_hours: f64,
}

/// Coarse level of a completion percentage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProgressBand {
    /// Less than half done
    Low,
    /// At least half done, but not everything
    Medium,
    Complete,
}

impl ProgressBand {
    pub fn from_percent(percent: u8) -> Self {
        if percent < 50 {
            ProgressBand::Low
        } else if percent < 100 {
            ProgressBand::Medium
        } else {
            ProgressBand::Complete
        }
    }
}

impl Progress {
    /// Hours left to do. Never negative.
    pub fn remaining_hours(&self) -> f64 {
        (self.total_hours - self.completed_hours).max(0.0)
    }

    /// Share of hours done, rounded, in `[0, 100]`. This is 0 when there is nothing to do.
    pub fn percent(&self) -> u8 {
        rounded_percent(self.completed_hours, self.total_hours)
    }

    /// Share of tasks done, rounded, in `[0, 100]`. This is 0 when there is no task.
    pub fn task_percent(&self) -> u8 {
        rounded_percent(self.completed_count as f64, self.task_count as f64)
    }

    pub fn all_done(&self) -> bool {
        self.task_count > 0 && self.completed_count == self.task_count
    }
}

fn rounded_percent(done: f64, total: f64) -> u8 {
    if total <= 0.0 || done.is_finite() == false || total.is_finite() == false {
        return 0;
    }
    let percent = (done / total * 100.0).round();
    percent.max(0.0).min(100.0) as u8
}


/// Aggregates the tasks accepted by `predicate`.
///
/// `attributed_hours` tells how many hours a task weighs in this aggregate (e.g. its full estimate, or a single day of it).
/// Negative weights count as zero.
pub fn aggregate<P, H>(tasks: &[Task], predicate: P, attributed_hours: H) -> Progress
where
    P: Fn(&Task) -> bool,
    H: Fn(&Task) -> f64,
{
    let mut progress = Progress::default();
    for task in tasks.iter().filter(|task| predicate(task)) {
        let hours = attributed_hours(task).max(0.0);
        progress.task_count += 1;
        progress.total_hours += hours;
        if task.completed() {
            progress.completed_count += 1;
            progress.completed_hours += hours;
        }
    }
    progress
}

/// Progress over every task whose deadline has not passed, weighted by their full estimate
pub fn all_valid(tasks: &[Task], today: NaiveDate) -> Progress {
    aggregate(tasks,
              |task| is_valid(task, today),
              |task| task.estimated_hours())
}

/// Progress over the tasks scheduled today, weighted by their share of today
pub fn today_view(tasks: &[Task], today: NaiveDate) -> Progress {
    aggregate(tasks,
              |task| is_scheduled_today(task, today),
              |task| daily_hours(task, today).unwrap_or(0.0))
}


/// Hours done today, against the total of every valid task
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct HoursSummary {
    pub completed_today: f64,
    pub total_valid: f64,
}

impl HoursSummary {
    pub fn remaining(&self) -> f64 {
        (self.total_valid - self.completed_today).max(0.0)
    }
}

/// Computes how much of the overall workload today's completed tasks account for
pub fn hours_today_against_valid(tasks: &[Task], today: NaiveDate) -> HoursSummary {
    HoursSummary {
        completed_today: today_view(tasks, today).completed_hours,
        total_valid: all_valid(tasks, today).total_hours,
    }
}
