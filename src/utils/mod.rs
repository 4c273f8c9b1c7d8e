//! Some utility functions

use chrono::{Local, NaiveDate};

use crate::dashboard::Dashboard;
use crate::task::{SyncStatus, Task};

/// The current local date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date the way it is displayed on task cards (`Oct 16, 2026`)
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// As many stars as the difficulty
pub fn difficulty_stars(difficulty: u32) -> String {
    "⭐".repeat(difficulty as usize)
}


/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let sync = match task.sync_status() {
        SyncStatus::NotSynced => ".",
        SyncStatus::Synced => "=",
        SyncStatus::LocallyModified => "~",
        SyncStatus::LocallyDeleted => "x",
    };
    let start = task.start_date()
        .map(|date| date.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!("    {}{} {}\t{} -> {}\t{}h\t{}", completion, sync, task.name(), start, task.deadline(), task.estimated_hours(), task.id());
}

/// A debug utility that pretty-prints a dashboard
pub fn print_dashboard(dashboard: &Dashboard) {
    println!("TASKS ({})", dashboard.task_bar.text);
    for card in &dashboard.tasks {
        let completion = if card.completed { "✓" } else { " " };
        println!("    {} {}\t{}\t{}h\t{}", completion, card.title, card.dates, card.estimated_hours, card.stars);
    }

    println!("TODAY");
    if dashboard.today.is_empty() {
        println!("    No tasks for today 🎉");
    }
    for card in &dashboard.today {
        let completion = if card.completed { "✓" } else { " " };
        println!("    {} {}\t{}h today", completion, card.title, card.hours_today);
    }

    println!("PROGRESS");
    println!("    overall: {}/{} tasks, {:.1}h done, {:.1}h left, {}%",
             dashboard.overall.completed_count, dashboard.overall.task_count,
             dashboard.overall.completed_hours, dashboard.overall.remaining_hours(), dashboard.overall.percent());
    println!("    today:   {}/{} tasks, {:.1}h done, {:.1}h left, {}%",
             dashboard.daily.completed_count, dashboard.daily.task_count,
             dashboard.daily.completed_hours, dashboard.daily.remaining_hours(), dashboard.daily.percent());

    println!("CALENDAR");
    for entry in &dashboard.calendar {
        println!("    {}  {}", entry.date, entry.title);
    }

    println!("TIMER {} ({})", dashboard.timer.display, dashboard.timer.label);
    if let Some(err) = &dashboard.error {
        println!("ERROR {}", err);
    }
}
