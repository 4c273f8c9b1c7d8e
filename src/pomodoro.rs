//! A pomodoro timer
//!
//! The timer alternates between focus sessions and breaks. It is a plain state machine ([`Pomodoro`]) that does not know about time:
//! something has to call [`Pomodoro::tick`] once per second. [`run_ticker`] does exactly that, and publishes the timer state after every tick.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::config::{BREAK_DURATION, FOCUS_DURATION, TICK_PERIOD};


/// What the current session is about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// Full length of this phase, in seconds
    pub fn duration(&self) -> u32 {
        match self {
            Phase::Focus => FOCUS_DURATION,
            Phase::Break => BREAK_DURATION,
        }
    }

    /// The phase that follows this one
    pub fn next(&self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus Time",
            Phase::Break => "Break Time",
        }
    }

    /// What to tell the user when this phase begins
    pub fn notice(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus Time!",
            Phase::Break => "Break Time!",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}


#[derive(Clone, Debug, PartialEq)]
pub struct Pomodoro {
    phase: Phase,
    state: TimerState,
    /// Seconds left in the current phase
    remaining: u32,
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}

impl Pomodoro {
    /// An idle timer, at the beginning of a focus session
    pub fn new() -> Self {
        Self {
            phase: Phase::Focus,
            state: TimerState::Idle,
            remaining: Phase::Focus.duration(),
        }
    }

    pub fn phase(&self) -> Phase       { self.phase     }
    pub fn state(&self) -> TimerState  { self.state     }
    pub fn remaining(&self) -> u32     { self.remaining }
    pub fn is_running(&self) -> bool   { self.state == TimerState::Running }

    /// Start (or resume) the countdown. Does nothing if it is already running.
    pub fn start(&mut self) {
        if self.state == TimerState::Running {
            return;
        }
        self.state = TimerState::Running;
    }

    /// Pause the countdown. Does nothing unless it is running.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
        }
    }

    /// Stop the countdown, and rewind the current phase
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining = self.phase.duration();
    }

    /// One second has elapsed.
    ///
    /// When the current phase ends, the timer switches to the next phase, stops, and returns the phase that begins.
    pub fn tick(&mut self) -> Option<Phase> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }

        self.phase = self.phase.next();
        self.state = TimerState::Idle;
        self.remaining = self.phase.duration();
        log::info!("{}", self.phase.notice());
        Some(self.phase)
    }

    /// Remaining time, as `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// How much of the current phase has elapsed, in percent
    pub fn progress(&self) -> f64 {
        let total = self.phase.duration();
        if total == 0 {
            return 0.0;
        }
        f64::from(total - self.remaining.min(total)) / f64::from(total) * 100.0
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            state: self.state,
            remaining: self.remaining,
            display: self.display(),
            label: self.phase.label(),
            progress: self.progress(),
        }
    }
}


/// Everything needed to display a timer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub state: TimerState,
    pub remaining: u32,
    pub display: String,
    pub label: &'static str,
    pub progress: f64,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Pomodoro::new().snapshot()
    }
}


/// See [`timer_channel`]
pub type TimerSender = tokio::sync::watch::Sender<TimerSnapshot>;
/// See [`timer_channel`]
pub type TimerReceiver = tokio::sync::watch::Receiver<TimerSnapshot>;

/// Create a channel, that can be used to follow a timer driven by [`run_ticker`]
pub fn timer_channel() -> (TimerSender, TimerReceiver) {
    tokio::sync::watch::channel(TimerSnapshot::default())
}

/// Ticks `timer` every second, and publishes its state to `sender`.
///
/// This returns once every receiver has been dropped.
pub async fn run_ticker(timer: Arc<Mutex<Pomodoro>>, sender: TimerSender) {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    // the first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let snapshot = {
            let mut timer = match timer.lock() {
                Ok(timer) => timer,
                Err(poisoned) => poisoned.into_inner(),
            };
            timer.tick();
            timer.snapshot()
        };

        if sender.send(snapshot).is_err() {
            log::debug!("No one is watching the timer anymore, stopping the ticker");
            return;
        }
    }
}
