//! A study coach, that periodically posts tips and comments on the progress
//!
//! The decisions are pure functions ([`pick_tip`], [`progress_check`]).
//! [`spawn_coach`] runs them on their own schedules, and sends what they have to say over a channel.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::{
    FIRST_PROGRESS_CHECK, NUDGE_THRESHOLD, PRAISE_THRESHOLD, PROGRESS_CHECK_PERIOD,
    REMINDER_PERIOD, REMINDER_PROBABILITY, STUDY_TIPS, URGENT_WINDOW_DAYS,
};
use crate::Task;


/// Something the coach has to say
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoachMessage {
    Tip(&'static str),
    /// Most tasks are done
    Praise,
    /// Few tasks are done
    Nudge,
    /// Some uncompleted tasks are due soon
    Urgent(usize),
}

impl Display for CoachMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoachMessage::Tip(tip) => write!(f, "{}", tip),
            CoachMessage::Praise => write!(f, "🔥 You're crushing it! Over 70% of your tasks are done!"),
            CoachMessage::Nudge => write!(f, "⚠️ Let's pick up the pace! Try finishing one small task right now."),
            CoachMessage::Urgent(count) => write!(f, "🚨 You have {} task(s) due soon! Prioritize them now.", count),
        }
    }
}


/// Maybe picks a study tip. Most of the time, this returns `None`
pub fn pick_tip<R: Rng>(rng: &mut R) -> Option<CoachMessage> {
    if rng.gen_bool(REMINDER_PROBABILITY) == false {
        return None;
    }
    STUDY_TIPS.choose(rng).map(|tip| CoachMessage::Tip(*tip))
}

/// Comments on how many tasks are done, and on the ones that are due soon
pub fn progress_check(tasks: &[Task], today: NaiveDate) -> Vec<CoachMessage> {
    let mut messages = Vec::new();
    if tasks.is_empty() {
        return messages;
    }

    let completed = tasks.iter().filter(|task| task.completed()).count();
    let completion_rate = completed as f64 / tasks.len() as f64;
    if completion_rate >= PRAISE_THRESHOLD {
        messages.push(CoachMessage::Praise);
    } else if completion_rate < NUDGE_THRESHOLD {
        messages.push(CoachMessage::Nudge);
    }

    let urgent = tasks.iter()
        .filter(|task| task.completed() == false)
        .filter(|task| (task.deadline() - today).num_days() <= URGENT_WINDOW_DAYS)
        .count();
    if urgent > 0 {
        messages.push(CoachMessage::Urgent(urgent));
    }

    messages
}


/// Starts the reminder and progress-check schedules.
///
/// Tasks are read from `tasks` (see [`Store::subscribe`](crate::state::Store::subscribe)), messages are sent to `sender`.
/// Both schedules stop once the receiving end of `sender` is dropped.
pub fn spawn_coach<F>(tasks: watch::Receiver<Vec<Task>>, sender: mpsc::UnboundedSender<CoachMessage>, clock: F) -> (JoinHandle<()>, JoinHandle<()>)
where
    F: Fn() -> NaiveDate + Send + 'static,
{
    let reminder_sender = sender.clone();
    let reminders = tokio::spawn(async move {
        let start = tokio::time::Instant::now() + REMINDER_PERIOD;
        let mut interval = tokio::time::interval_at(start, REMINDER_PERIOD);
        loop {
            interval.tick().await;
            let tip = pick_tip(&mut rand::thread_rng());
            if let Some(tip) = tip {
                if send(&reminder_sender, tip).is_err() {
                    return;
                }
            } else if reminder_sender.is_closed() {
                return;
            }
        }
    });

    let checks = tokio::spawn(async move {
        tokio::time::sleep(FIRST_PROGRESS_CHECK).await;
        loop {
            let messages = progress_check(&tasks.borrow(), clock());
            for message in messages {
                if send(&sender, message).is_err() {
                    return;
                }
            }
            if sender.is_closed() {
                return;
            }
            tokio::time::sleep(PROGRESS_CHECK_PERIOD).await;
        }
    });

    (reminders, checks)
}

fn send(sender: &mpsc::UnboundedSender<CoachMessage>, message: CoachMessage) -> Result<(), ()> {
    log::info!("{}: {}", crate::config::coach_name(), message);
    sender.send(message).map_err(|_| {
        log::debug!("No one listens to the coach anymore");
    })
}
