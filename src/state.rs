//! Application state, and the commands that update it
//!
//! Every user action is a [`Command`]. Applying a command is split in three pure steps:
//! * [`begin`] applies the change locally, right away (an "optimistic" update), and tells what must be confirmed by the backend,
//! * [`confirm`] reconciles the local state with what the backend replied,
//! * [`rollback`] reverts the optimistic update when the backend failed.
//!
//! A [`Store`] glues these steps with an actual [`TaskSource`].

use std::error::Error;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::pomodoro::Pomodoro;
use crate::task::{NewTask, SyncStatus, Task, TaskEdit, TaskId};
use crate::traits::TaskSource;


/// Everything the page displays derives from this
#[derive(Clone, Debug, Default)]
pub struct AppState {
    tasks: Vec<Task>,
    timer: Pomodoro,
    /// The last failure, to be surfaced to the user
    last_error: Option<String>,
    /// The last timer notice ("Break Time!"...)
    last_notice: Option<String>,
}

impl AppState {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, ..Self::default() }
    }

    /// Every stored task, including the ones waiting for a deletion to be acknowledged
    pub fn tasks(&self) -> &[Task]                  { &self.tasks }
    pub fn timer(&self) -> &Pomodoro                { &self.timer }
    pub fn last_error(&self) -> Option<&str>        { self.last_error.as_deref() }
    pub fn last_notice(&self) -> Option<&str>       { self.last_notice.as_deref() }

    /// The tasks that are not waiting for a deletion to be acknowledged. This is what views display
    pub fn live_tasks(&self) -> Vec<Task> {
        self.tasks.iter()
            .filter(|task| task.is_deleted() == false)
            .cloned()
            .collect()
    }

    /// Finds a task. Tasks marked for deletion are not found
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id && task.is_deleted() == false)
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id && task.is_deleted() == false)
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}


/// A user intent
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Fetch every task from the backend again
    Reload,
    AddTask(NewTask),
    DeleteTask(TaskId),
    ToggleTaskComplete(TaskId),
    EditTask(TaskId, TaskEdit),
    /// Mark or unmark a single day of a task as done. This is only kept locally.
    ToggleDayDone(TaskId, NaiveDate),
    StartTimer,
    PauseTimer,
    ResetTimer,
    /// One second has elapsed on the timer
    Tick,
}


/// The part of a command that the backend must confirm, along with what is needed to revert it
#[derive(Clone, Debug, PartialEq)]
pub enum Pending {
    /// The command was fully applied locally
    Nothing,
    /// The command was refused before reaching the backend
    Rejected(String),
    Reload,
    Create { local_id: TaskId, body: NewTask },
    Delete { id: TaskId, previous: SyncStatus },
    Toggle { id: TaskId, previous: bool },
    Edit { previous: Task, edit: TaskEdit },
}

/// What the backend replied to a [`Pending`] operation
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Loaded(Vec<Task>),
    Created(TaskId),
    Deleted,
    Toggled(bool),
    Edited,
}


/// Applies `command` locally, and returns what remains to be confirmed by the backend
pub fn begin(mut state: AppState, command: &Command, today: NaiveDate) -> (AppState, Pending) {
    let pending = match command {
        Command::Reload => Pending::Reload,

        Command::AddTask(body) => {
            match body.validate(today) {
                Err(err) => Pending::Rejected(err.to_string()),
                Ok(()) => {
                    let task = Task::new_local(body);
                    let local_id = task.id().clone();
                    state.tasks.push(task);
                    Pending::Create { local_id, body: body.clone() }
                },
            }
        },

        Command::DeleteTask(id) => {
            match state.task_mut(id) {
                None => Pending::Rejected(format!("No task {}", id)),
                Some(task) => {
                    let previous = task.mark_for_deletion();
                    Pending::Delete { id: id.clone(), previous }
                },
            }
        },

        Command::ToggleTaskComplete(id) => {
            match state.task_mut(id) {
                None => Pending::Rejected(format!("No task {}", id)),
                Some(task) => {
                    let previous = task.completed();
                    task.set_completed(previous == false);
                    Pending::Toggle { id: id.clone(), previous }
                },
            }
        },

        Command::EditTask(id, edit) => {
            match state.task_mut(id) {
                None => Pending::Rejected(format!("No task {}", id)),
                Some(task) => {
                    let previous = task.clone();
                    task.apply_edit(edit);
                    Pending::Edit { previous, edit: edit.clone() }
                },
            }
        },

        Command::ToggleDayDone(id, date) => {
            match state.task_mut(id) {
                None => Pending::Rejected(format!("No task {}", id)),
                Some(task) => {
                    task.toggle_day_done(*date);
                    Pending::Nothing
                },
            }
        },

        Command::StartTimer => { state.timer.start(); Pending::Nothing },
        Command::PauseTimer => { state.timer.pause(); Pending::Nothing },
        Command::ResetTimer => { state.timer.reset(); Pending::Nothing },
        Command::Tick => {
            if let Some(phase) = state.timer.tick() {
                state.last_notice = Some(phase.notice().to_string());
            }
            Pending::Nothing
        },
    };

    if let Pending::Rejected(reason) = &pending {
        log::warn!("Refusing {:?}: {}", command, reason);
        state.last_error = Some(reason.clone());
    }
    (state, pending)
}

/// Reconciles the local state with what the backend replied
pub fn confirm(mut state: AppState, pending: Pending, outcome: Outcome) -> AppState {
    match (pending, outcome) {
        (Pending::Reload, Outcome::Loaded(mut tasks)) => {
            // the backend does not store per-day marks
            for task in tasks.iter_mut() {
                if let Some(local) = state.tasks.iter().find(|local| local.id() == task.id()) {
                    task.keep_day_marks(local);
                }
            }
            state.tasks = tasks;
        },

        (Pending::Create { local_id, .. }, Outcome::Created(remote_id)) => {
            match state.task_mut(&local_id) {
                None => log::warn!("Task {} vanished before the backend acknowledged it", local_id),
                Some(task) => {
                    task.set_id(remote_id);
                    task.set_sync_status(SyncStatus::Synced);
                },
            }
        },

        (Pending::Delete { id, .. }, Outcome::Deleted) => {
            state.tasks.retain(|task| task.id() != &id);
        },

        (Pending::Toggle { id, .. }, Outcome::Toggled(completed)) => {
            if let Some(task) = state.task_mut(&id) {
                if task.completed() != completed {
                    log::info!("Task {} is {} on the backend, following it", id, if completed { "completed" } else { "not completed" });
                }
                task.set_completed(completed);
                task.set_sync_status(SyncStatus::Synced);
            }
        },

        (Pending::Edit { previous, .. }, Outcome::Edited) => {
            if let Some(task) = state.task_mut(previous.id()) {
                task.set_sync_status(SyncStatus::Synced);
            }
        },

        (pending, outcome) => {
            log::warn!("Unexpected outcome {:?} for {:?}", outcome, pending);
            return state;
        },
    }

    state.last_error = None;
    state
}

/// Reverts an optimistic update that the backend did not accept
pub fn rollback(mut state: AppState, pending: Pending, error: String) -> AppState {
    match pending {
        Pending::Nothing | Pending::Rejected(_) => {},

        // Nothing to show this time. The next reload is the way to recover.
        Pending::Reload => state.tasks.clear(),

        Pending::Create { local_id, .. } => {
            state.tasks.retain(|task| task.id() != &local_id);
        },

        Pending::Delete { id, previous } => {
            if let Some(task) = state.tasks.iter_mut().find(|task| task.id() == &id) {
                task.set_sync_status(previous);
            }
        },

        Pending::Toggle { id, previous } => {
            if let Some(task) = state.task_mut(&id) {
                task.set_completed(previous);
                task.set_sync_status(SyncStatus::Synced);
            }
        },

        Pending::Edit { previous, .. } => {
            if let Some(task) = state.task_mut(previous.id()) {
                *task = previous;
            }
        },
    }

    state.last_error = Some(error);
    state
}


/// Holds the application state, and applies commands to it and to a task source
pub struct Store<S> {
    source: S,
    state: AppState,
    clock: Box<dyn Fn() -> NaiveDate + Send + Sync>,

    tasks_sender: watch::Sender<Vec<Task>>,
    tasks_receiver: watch::Receiver<Vec<Task>>,
}

impl<S> Store<S>
where
    S: TaskSource,
{
    /// Create a store with no task. Dispatch a [`Command::Reload`] to populate it
    pub fn new(source: S) -> Self {
        Self::with_clock(source, crate::utils::today)
    }

    /// Create a store that uses a custom clock to know what "today" is
    pub fn with_clock<F>(source: S, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        let (tasks_sender, tasks_receiver) = watch::channel(Vec::new());
        Self {
            source,
            state: AppState::default(),
            clock: Box::new(clock),
            tasks_sender,
            tasks_receiver,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    /// A receiver that is notified every time the task list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks_receiver.clone()
    }

    /// Applies a command, and returns the new state.
    ///
    /// Failures are not returned, but logged and stored in [`AppState::last_error`].
    pub async fn dispatch(&mut self, command: Command) -> &AppState {
        let today = self.today();
        let state = std::mem::take(&mut self.state);
        let (state, pending) = begin(state, &command, today);

        let state = match self.run(&pending).await {
            None => state,
            Some(Ok(outcome)) => confirm(state, pending, outcome),
            Some(Err(err)) => {
                log::warn!("Unable to apply {:?}: {}", command, err);
                rollback(state, pending, err)
            },
        };

        self.state = state;
        self.publish_tasks();
        &self.state
    }

    /// Sends a pending operation to the source. Returns `None` if there is nothing to send
    async fn run(&self, pending: &Pending) -> Option<Result<Outcome, String>> {
        let result: Result<Outcome, Box<dyn Error>> = match pending {
            Pending::Nothing | Pending::Rejected(_) => return None,
            Pending::Reload => self.source.get_tasks().await.map(Outcome::Loaded),
            Pending::Create { body, .. } => self.source.create_task(body).await.map(Outcome::Created),
            Pending::Delete { id, .. } => self.source.delete_task(id).await.map(|_| Outcome::Deleted),
            Pending::Toggle { id, .. } => self.source.toggle_completion(id).await.map(Outcome::Toggled),
            Pending::Edit { previous, edit } => self.source.update_task(previous.id(), edit).await.map(|_| Outcome::Edited),
        };
        Some(result.map_err(|err| err.to_string()))
    }

    fn publish_tasks(&self) {
        let tasks = self.state.live_tasks();
        if *self.tasks_receiver.borrow() == tasks {
            return;
        }
        if let Err(err) = self.tasks_sender.send(tasks) {
            log::debug!("Unable to publish tasks: {}", err);
        }
    }
}
