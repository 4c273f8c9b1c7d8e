//! Per-day calendar entries

use chrono::NaiveDate;
use csscolorparser::Color;
use serde::Serialize;

use crate::Task;
use super::{date_range_length, hours_per_day, is_valid};


/// How a calendar entry is styled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EntryStyle {
    /// The day has passed and the study session did not happen
    Missed,
    /// The day is today or later
    Upcoming,
}

impl EntryStyle {
    pub fn background(&self) -> Color {
        match self {
            EntryStyle::Missed => Color::from_rgb_u8(0xff, 0x55, 0x55),
            EntryStyle::Upcoming => Color::from_rgb_u8(0x00, 0xff, 0x88),
        }
    }

    pub fn border(&self) -> Color {
        match self {
            EntryStyle::Missed => Color::from_rgb_u8(0xff, 0x00, 0x00),
            EntryStyle::Upcoming => Color::from_rgb_u8(0x00, 0xcc, 0x77),
        }
    }
}


/// A study session of a task, on a given day
#[derive(Clone, Debug, Serialize)]
pub struct CalendarEntry {
    pub title: String,
    pub date: NaiveDate,
    pub style: EntryStyle,
    pub description: String,
    pub background: Color,
    pub border: Color,
}


/// A lazy sequence of the calendar entries of a task.
///
/// See [`events_for_task`]
#[derive(Clone, Debug)]
pub struct TaskDays<'a> {
    task: &'a Task,
    today: NaiveDate,
    /// `None` once the sequence is exhausted
    current: Option<NaiveDate>,
    hours_label: String,
}

impl<'a> Iterator for TaskDays<'a> {
    type Item = CalendarEntry;

    fn next(&mut self) -> Option<CalendarEntry> {
        loop {
            let date = self.current?;
            if date > self.task.deadline() {
                self.current = None;
                return None;
            }
            self.current = date.succ_opt();

            if self.task.is_done_on(date) {
                continue;
            }
            return Some(self.entry(date));
        }
    }
}

impl<'a> TaskDays<'a> {
    fn entry(&self, date: NaiveDate) -> CalendarEntry {
        let style = if date < self.today { EntryStyle::Missed } else { EntryStyle::Upcoming };
        let name = self.task.name();
        let description = match style {
            EntryStyle::Missed => format!("⚠️ Missed study for {}", name),
            EntryStyle::Upcoming => format!("Study {} for {} hours", name, self.hours_label),
        };

        CalendarEntry {
            title: format!("📚 {} ({}h)", name, self.hours_label),
            date,
            style,
            description,
            background: style.background(),
            border: style.border(),
        }
    }
}


/// The calendar entries of a single task, from `max(start date, today)` to its deadline (included).
///
/// Days marked as done are skipped. A task whose deadline is before its start date yields nothing.
/// Nothing is cached: calling this again restarts the sequence from scratch.
pub fn events_for_task(task: &Task, today: NaiveDate) -> TaskDays<'_> {
    events_for_task_from(task, today, today)
}

/// The calendar entries of a single task, from `max(start date, from)` to its deadline (included).
///
/// Entries dated before `today` are styled as [`EntryStyle::Missed`].
pub fn events_for_task_from(task: &Task, from: NaiveDate, today: NaiveDate) -> TaskDays<'_> {
    let start = task.effective_start(today);
    let (current, per_day) = match date_range_length(start, task.deadline()) {
        None => (None, 0.0),
        Some(range_length) => (Some(start.max(from)), hours_per_day(task.estimated_hours(), range_length)),
    };

    TaskDays {
        task,
        today,
        current,
        hours_label: format!("{:.2}", per_day),
    }
}

/// The calendar entries of every task that still needs some work.
///
/// Completed tasks and tasks whose deadline has passed are left out.
pub fn calendar<'a, I>(tasks: I, today: NaiveDate) -> impl Iterator<Item = CalendarEntry> + 'a
where
    I: IntoIterator<Item = &'a Task>,
    I::IntoIter: 'a,
{
    tasks.into_iter()
        .filter(move |task| task.completed() == false && is_valid(task, today))
        .flat_map(move |task| events_for_task(task, today))
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{TaskId, TaskType, DATE_FORMAT};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn task(id: u64, start: &str, deadline: &str, hours: f64) -> Task {
        Task::new(TaskId::Remote(id), format!("Task {}", id), TaskType::Subject,
                  Some(date(start)), date(deadline), hours, 2)
    }

    #[test]
    fn test_three_day_task() {
        let today = date("2026-10-16");
        let t = task(1, "2026-10-16", "2026-10-18", 9.0);
        let entries: Vec<_> = events_for_task(&t, today).collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, date("2026-10-16"));
        assert_eq!(entries[2].date, date("2026-10-18"));
        assert_eq!(entries[0].title, "📚 Task 1 (3.00h)");
        assert_eq!(entries[0].description, "Study Task 1 for 3.00 hours");
        assert!(entries.iter().all(|e| e.style == EntryStyle::Upcoming));
    }

    #[test]
    fn test_completed_day_is_skipped() {
        let today = date("2026-10-16");
        let mut t = task(1, "2026-10-16", "2026-10-18", 9.0);
        t.toggle_day_done(date("2026-10-16"));

        let dates: Vec<_> = events_for_task(&t, today).map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2026-10-17"), date("2026-10-18")]);
    }

    #[test]
    fn test_started_task_begins_today() {
        let today = date("2026-10-16");
        let t = task(1, "2026-10-12", "2026-10-17", 12.0);
        let entries: Vec<_> = events_for_task(&t, today).collect();

        // 6 days in range, but only today and tomorrow are shown
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, today);
        assert_eq!(entries[0].title, "📚 Task 1 (2.00h)");
    }

    #[test]
    fn test_reversed_range_yields_nothing() {
        let today = date("2026-10-01");
        let t = task(1, "2026-10-18", "2026-10-16", 9.0);
        assert_eq!(events_for_task(&t, today).count(), 0);
    }

    #[test]
    fn test_sequence_is_restartable() {
        let today = date("2026-10-16");
        let t = task(1, "2026-10-16", "2026-10-20", 5.0);
        let first: Vec<_> = events_for_task(&t, today).map(|e| e.date).collect();
        let second: Vec<_> = events_for_task(&t, today).map(|e| e.date).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_calendar_filters_tasks() {
        let today = date("2026-10-16");
        let open = task(1, "2026-10-16", "2026-10-17", 2.0);
        let expired = task(2, "2026-10-10", "2026-10-15", 2.0);
        let mut done = task(3, "2026-10-16", "2026-10-17", 2.0);
        done.set_completed(true);
        let reversed = task(4, "2026-10-20", "2026-10-18", 2.0);

        let tasks = vec![open, expired, done, reversed];
        let entries: Vec<_> = calendar(&tasks, today).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.title.starts_with("📚 Task 1 ")));
    }

    #[test]
    fn test_missed_style() {
        assert_eq!(EntryStyle::Missed.background(), Color::from_rgb_u8(0xff, 0x55, 0x55));
        assert_eq!(EntryStyle::Upcoming.border(), Color::from_rgb_u8(0x00, 0xcc, 0x77));

        let today = date("2026-10-16");
        let mut t = task(1, "2026-10-10", "2026-10-20", 11.0);
        t.toggle_day_done(date("2026-10-11"));
        let entries: Vec<_> = events_for_task_from(&t, date("2026-10-01"), today).collect();

        // starts on the start date, the 11th is done
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].date, date("2026-10-10"));
        assert_eq!(entries[1].date, date("2026-10-12"));
        assert_eq!(entries[1].style, EntryStyle::Missed);
        assert_eq!(entries[1].description, "⚠️ Missed study for Task 1");
        assert_eq!(entries[1].background, EntryStyle::Missed.background());
        assert_eq!(entries[5].date, today);
        assert_eq!(entries[5].style, EntryStyle::Upcoming);
        assert_eq!(entries[0].title, "📚 Task 1 (1.00h)");
    }
}
