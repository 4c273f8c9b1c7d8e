//! What the study planner page displays, computed from an [`AppState`]
//!
//! Rendering is a function of a state snapshot: build a new [`Dashboard`] whenever the state changes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::pomodoro::TimerSnapshot;
use crate::state::AppState;
use crate::task::{Task, TaskId};
use crate::utils::{difficulty_stars, format_display_date};
use crate::workload::{self, CalendarEntry, HoursSummary, Progress, ProgressBand};


/// A task, as shown in the task list
#[derive(Clone, Debug, Serialize)]
pub struct TaskCard {
    pub id: TaskId,
    /// Type emoji and name
    pub title: String,
    pub dates: String,
    pub estimated_hours: f64,
    pub stars: String,
    pub completed: bool,
}

impl TaskCard {
    fn new(task: &Task) -> Self {
        let start = task.start_date().map(format_display_date).unwrap_or_default();
        Self {
            id: task.id().clone(),
            title: format!("{} {}", task.task_type().emoji(), task.name()),
            dates: format!("{} to {}", start, format_display_date(task.deadline())),
            estimated_hours: task.estimated_hours(),
            stars: difficulty_stars(task.difficulty()),
            completed: task.completed(),
        }
    }
}

/// A task, as shown in the "today" section
#[derive(Clone, Debug, Serialize)]
pub struct TodayCard {
    pub id: TaskId,
    pub title: String,
    /// The share of the task that falls today, rounded to a tenth of an hour
    pub hours_today: f64,
    pub completed: bool,
}

/// The task-count progress bar
#[derive(Clone, Debug, Serialize)]
pub struct TaskBar {
    pub done: usize,
    pub total: usize,
    pub percent: u8,
    pub band: ProgressBand,
    pub text: String,
}

impl TaskBar {
    fn new(progress: &Progress) -> Self {
        let percent = progress.task_percent();
        Self {
            done: progress.completed_count,
            total: progress.task_count,
            percent,
            band: ProgressBand::from_percent(percent),
            text: format!("{} of {} tasks completed", progress.completed_count, progress.task_count),
        }
    }
}


#[derive(Clone, Debug, Serialize)]
pub struct Dashboard {
    /// Tasks whose deadline has not passed
    pub tasks: Vec<TaskCard>,
    /// Tasks scheduled today
    pub today: Vec<TodayCard>,
    /// Progress over every valid task
    pub overall: Progress,
    /// Progress over today's tasks
    pub daily: Progress,
    pub hours: HoursSummary,
    pub task_bar: TaskBar,
    /// Every valid task is done
    pub celebrate: bool,
    pub calendar: Vec<CalendarEntry>,
    pub timer: TimerSnapshot,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl Dashboard {
    pub fn build(state: &AppState, today: NaiveDate) -> Self {
        let live_tasks = state.live_tasks();
        let tasks = &live_tasks[..];

        let task_cards = tasks.iter()
            .filter(|task| workload::is_valid(task, today))
            .map(TaskCard::new)
            .collect();

        let today_cards = tasks.iter()
            .filter(|task| workload::is_scheduled_today(task, today))
            .map(|task| TodayCard {
                id: task.id().clone(),
                title: format!("{} {}", task.task_type().emoji(), task.name()),
                hours_today: (workload::daily_hours(task, today).unwrap_or(0.0) * 10.0).round() / 10.0,
                completed: task.completed(),
            })
            .collect();

        let overall = workload::aggregate::all_valid(tasks, today);
        let daily = workload::aggregate::today_view(tasks, today);
        let celebrate = overall.all_done();
        if celebrate {
            log::info!("🎉 All tasks completed! Well done!");
        }

        Self {
            tasks: task_cards,
            today: today_cards,
            overall,
            daily,
            hours: workload::aggregate::hours_today_against_valid(tasks, today),
            task_bar: TaskBar::new(&overall),
            celebrate,
            calendar: workload::calendar::calendar(tasks, today).collect(),
            timer: state.timer().snapshot(),
            error: state.last_error().map(String::from),
            notice: state.last_notice().map(String::from),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{TaskType, DATE_FORMAT};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn task(id: u64, ty: TaskType, start: &str, deadline: &str, hours: f64, completed: bool) -> Task {
        let mut t = Task::new(TaskId::Remote(id), format!("Task {}", id), ty,
                              Some(date(start)), date(deadline), hours, 3);
        t.set_completed(completed);
        t
    }

    #[test]
    fn test_dashboard() {
        let today = date("2026-10-16");
        let state = AppState::new(vec![
            task(1, TaskType::Certification, "2026-10-14", "2026-10-19", 10.0, false),
            task(2, TaskType::Practice, "2026-10-18", "2026-10-19", 4.0, true),
            task(3, TaskType::Subject, "2026-10-01", "2026-10-10", 4.0, false),
        ]);
        let dashboard = Dashboard::build(&state, today);

        assert_eq!(dashboard.tasks.len(), 2);
        assert_eq!(dashboard.tasks[0].title, "🏆 Task 1");
        assert_eq!(dashboard.tasks[0].dates, "Oct 14, 2026 to Oct 19, 2026");
        assert_eq!(dashboard.tasks[0].stars, "⭐⭐⭐");

        assert_eq!(dashboard.today.len(), 1);
        assert_eq!(dashboard.today[0].hours_today, 1.7);

        assert_eq!(dashboard.task_bar.text, "1 of 2 tasks completed");
        assert_eq!(dashboard.task_bar.band, ProgressBand::Medium);
        assert_eq!(dashboard.celebrate, false);

        // task 1 from today to the 19th, task 2 is done
        assert_eq!(dashboard.calendar.len(), 4);
        assert_eq!(dashboard.timer.display, "25:00");
        assert_eq!(dashboard.error, None);
    }

    #[test]
    fn test_celebration() {
        let today = date("2026-10-16");
        let state = AppState::new(vec![
            task(1, TaskType::Subject, "2026-10-14", "2026-10-19", 10.0, true),
            task(2, TaskType::Subject, "2026-10-01", "2026-10-10", 4.0, false),
        ]);
        let dashboard = Dashboard::build(&state, today);
        assert!(dashboard.celebrate);
        assert_eq!(dashboard.overall.percent(), 100);
        assert!(dashboard.calendar.is_empty());

        let empty = Dashboard::build(&AppState::default(), today);
        assert_eq!(empty.celebrate, false);
        assert_eq!(empty.task_bar.percent, 0);
        assert_eq!(empty.task_bar.band, ProgressBand::Low);
    }
}
