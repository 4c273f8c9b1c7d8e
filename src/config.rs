//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// Base URL of the study-planner backend, used by [`Client::from_default_url`](crate::client::Client::from_default_url).
/// Feel free to override it when initing this library.
pub static BACKEND_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:3000/".to_string())));

/// Name the study coach signs its messages with.
/// Feel free to override it when initing this library.
pub static COACH_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("StudyBot".to_string())));


/// Length of a focus session, in seconds
pub const FOCUS_DURATION: u32 = 25 * 60;
/// Length of a break, in seconds
pub const BREAK_DURATION: u32 = 5 * 60;
/// How often the pomodoro ticker wakes up
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// How often the coach may post a study tip
pub const REMINDER_PERIOD: Duration = Duration::from_secs(30 * 60);
/// Chance that a reminder period actually yields a tip
pub const REMINDER_PROBABILITY: f64 = 0.3;
/// Delay before the first progress check
pub const FIRST_PROGRESS_CHECK: Duration = Duration::from_secs(5 * 60);
/// Delay between two progress checks
pub const PROGRESS_CHECK_PERIOD: Duration = Duration::from_secs(15 * 60);
/// Uncompleted tasks due within that many days are reported as urgent
pub const URGENT_WINDOW_DAYS: i64 = 2;
/// Completion rate above which the coach congratulates
pub const PRAISE_THRESHOLD: f64 = 0.7;
/// Completion rate under which the coach nudges
pub const NUDGE_THRESHOLD: f64 = 0.3;

/// The tips the coach picks from
pub const STUDY_TIPS: [&str; 8] = [
    "Keep up the great work! 💪",
    "How about a short break and some deep breaths? 🌬️",
    "Reviewing yesterday’s notes can really boost retention! 🧠",
    "Finish one more task before a reward break! 🎉",
    "Stay hydrated and don’t skip meals! 🍎",
    "Try using a Pomodoro timer for focused bursts! ⏱️",
    "Mix up subjects to keep your brain active! 🌀",
    "Remember your long-term goal, one step at a time! 🚀",
];

/// Returns the current value of [`BACKEND_URL`]
pub fn backend_url() -> String {
    match BACKEND_URL.lock() {
        Ok(url) => url.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Returns the current value of [`COACH_NAME`]
pub fn coach_name() -> String {
    match COACH_NAME.lock() {
        Ok(name) => name.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
