//! Study tasks, as served by the backend task API

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::NaiveDate;
use uuid::Uuid;

/// The date format used on the wire (`2026-10-16`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";


/// Identifies a task.
///
/// Tasks known to the backend carry the numeric ID it assigned them.
/// A task that has been created locally but not confirmed by the backend yet gets a random local ID,
/// that is replaced once the creation is acknowledged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TaskId {
    Remote(u64),
    Local(Uuid),
}

impl TaskId {
    /// Generate a random local TaskId.
    pub fn random() -> Self {
        TaskId::Local(Uuid::new_v4())
    }

    pub fn is_local(&self) -> bool {
        match self {
            TaskId::Local(_) => true,
            _ => false,
        }
    }

    /// Returns the backend ID, if the backend knows this task
    pub fn as_remote(&self) -> Option<u64> {
        match self {
            TaskId::Remote(id) => Some(*id),
            TaskId::Local(_) => None,
        }
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId::Remote(id)
    }
}

impl FromStr for TaskId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u64>() {
            return Ok(TaskId::Remote(id));
        }
        let raw = s.strip_prefix("local-").unwrap_or(s);
        Uuid::parse_str(raw)
            .map(TaskId::Local)
            .map_err(|err| format!("Invalid task ID {:?}: {}", s, err))
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            TaskId::Remote(id) => write!(f, "{}", id),
            TaskId::Local(uuid) => write!(f, "local-{}", uuid.to_hyphenated()),
        }
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaskId::Remote(id) => serializer.serialize_u64(*id),
            TaskId::Local(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(id) => Ok(TaskId::Remote(id)),
            RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}



/// The kind of a task. This only affects how it is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    Subject,
    Practice,
    Certification,
    Custom,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Subject => "Subject",
            TaskType::Practice => "Practice",
            TaskType::Certification => "Certification",
            TaskType::Custom => "Custom",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TaskType::Subject => "📚",
            TaskType::Practice => "✏️",
            TaskType::Certification => "🏆",
            TaskType::Custom => "⭐",
        }
    }
}

impl From<&str> for TaskType {
    fn from(s: &str) -> Self {
        match s {
            "Subject" => TaskType::Subject,
            "Practice" => TaskType::Practice,
            "Certification" => TaskType::Certification,
            "Custom" => TaskType::Custom,
            other => {
                log::debug!("Unknown task type {:?}, treating it as Custom", other);
                TaskType::Custom
            },
        }
    }
}
impl From<String> for TaskType {
    fn from(s: String) -> Self {
        TaskType::from(s.as_str())
    }
}
impl From<TaskType> for String {
    fn from(t: TaskType) -> String {
        t.as_str().to_string()
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}



/// Describes whether this task matches what the backend last told us
#[derive(Clone, Debug, PartialEq)]
pub enum SyncStatus {
    /// This task has been locally created, and the backend has not acknowledged it yet
    NotSynced,
    /// This task is exactly what the backend sent (or acknowledged)
    Synced,
    /// This task has been locally modified, and the backend has not acknowledged the change yet
    LocallyModified,
    /// This task has been locally deleted, and the backend has not acknowledged the deletion yet.
    /// It is hidden from every view meanwhile
    LocallyDeleted,
}

impl Default for SyncStatus {
    fn default() -> Self {
        SyncStatus::Synced
    }
}



/// A study task
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    #[serde(rename = "type")]
    task_type: TaskType,

    /// The backend sends an empty string when a task has no start date
    #[serde(default, with = "optional_date")]
    start_date: Option<NaiveDate>,
    deadline: NaiveDate,

    /// Total effort for the whole date range
    estimated_hours: f64,
    difficulty: u32,

    /// Whole-task completion flag
    #[serde(default)]
    completed: bool,
    /// Per-day completion marks. These are independent from `completed`
    #[serde(default)]
    completed_dates: BTreeSet<NaiveDate>,

    #[serde(skip)]
    sync_status: SyncStatus,
}

impl Task {
    /// Create a Task the backend already knows about
    pub fn new(id: TaskId, name: String, task_type: TaskType,
               start_date: Option<NaiveDate>, deadline: NaiveDate,
               estimated_hours: f64, difficulty: u32) -> Self
    {
        Self {
            id,
            name,
            task_type,
            start_date,
            deadline,
            estimated_hours,
            difficulty,
            completed: false,
            completed_dates: BTreeSet::new(),
            sync_status: SyncStatus::Synced,
        }
    }

    /// Create a brand new Task that is not on the backend yet.
    /// This will pick a new (random) local task ID.
    pub fn new_local(new_task: &NewTask) -> Self {
        let mut task = Self::new(TaskId::random(), new_task.name.trim().to_string(), new_task.task_type,
                                 new_task.start_date, new_task.deadline,
                                 new_task.estimated_hours, new_task.difficulty);
        task.sync_status = SyncStatus::NotSynced;
        task
    }

    pub fn id(&self) -> &TaskId             { &self.id              }
    pub fn name(&self) -> &str              { &self.name            }
    pub fn task_type(&self) -> TaskType     { self.task_type        }
    pub fn start_date(&self) -> Option<NaiveDate> { self.start_date }
    pub fn deadline(&self) -> NaiveDate     { self.deadline         }
    pub fn difficulty(&self) -> u32         { self.difficulty       }
    pub fn completed(&self) -> bool         { self.completed        }
    pub fn sync_status(&self) -> &SyncStatus { &self.sync_status    }
    pub fn completed_dates(&self) -> &BTreeSet<NaiveDate> { &self.completed_dates }

    /// The estimated effort, in hours. Never negative.
    pub fn estimated_hours(&self) -> f64 {
        // f64::max also maps NaN to 0
        self.estimated_hours.max(0.0)
    }

    /// The first day of this task. Tasks without a start date start `today`.
    pub fn effective_start(&self, today: NaiveDate) -> NaiveDate {
        self.start_date.unwrap_or(today)
    }

    /// Whether `date` has been marked as done for this task
    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    pub fn set_id(&mut self, new_id: TaskId) {
        self.id = new_id;
    }

    pub fn set_sync_status(&mut self, new_status: SyncStatus) {
        self.sync_status = new_status;
    }

    /// Whether this task waits for the backend to acknowledge its deletion
    pub fn is_deleted(&self) -> bool {
        self.sync_status == SyncStatus::LocallyDeleted
    }

    /// Hide this task until the backend confirms its deletion.
    /// Returns the sync status it had before, so that the deletion can be reverted
    pub fn mark_for_deletion(&mut self) -> SyncStatus {
        std::mem::replace(&mut self.sync_status, SyncStatus::LocallyDeleted)
    }

    /// Carry over the per-day marks of `local` when the backend sent none for this task
    pub fn keep_day_marks(&mut self, local: &Task) {
        if self.completed_dates.is_empty() {
            self.completed_dates = local.completed_dates.clone();
        }
    }

    fn update_sync_status(&mut self) {
        match &self.sync_status {
            SyncStatus::NotSynced => return,
            SyncStatus::LocallyModified => return,
            SyncStatus::LocallyDeleted => return,
            SyncStatus::Synced => {
                self.sync_status = SyncStatus::LocallyModified;
            },
        }
    }

    /// Set the whole-task completion flag
    pub fn set_completed(&mut self, completed: bool) {
        self.update_sync_status();
        self.completed = completed;
    }

    /// Mark (or unmark) a single day as done.
    /// Returns whether the day is marked after this call.
    ///
    /// The backend does not store per-day marks, so this does not alter the sync status
    pub fn toggle_day_done(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }

    /// Apply a partial update
    pub fn apply_edit(&mut self, edit: &TaskEdit) {
        self.update_sync_status();
        if let Some(name) = &edit.name { self.name = name.clone(); }
        if let Some(task_type) = edit.task_type { self.task_type = task_type; }
        if let Some(start_date) = edit.start_date { self.start_date = Some(start_date); }
        if let Some(deadline) = edit.deadline { self.deadline = deadline; }
        if let Some(hours) = edit.estimated_hours { self.estimated_hours = hours; }
        if let Some(difficulty) = edit.difficulty { self.difficulty = difficulty; }
    }
}



/// The body of a task creation request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    #[serde(default, with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    pub deadline: NaiveDate,
    pub estimated_hours: f64,
    pub difficulty: u32,
}

impl NewTask {
    /// A custom task of medium difficulty, that starts whenever it is displayed
    pub fn custom(name: String, deadline: NaiveDate, estimated_hours: f64) -> Self {
        Self {
            name,
            task_type: TaskType::Custom,
            start_date: None,
            deadline,
            estimated_hours,
            difficulty: 2,
        }
    }

    /// Check this request makes sense before sending it
    pub fn validate(&self, today: NaiveDate) -> Result<(), Box<dyn Error>> {
        if self.name.trim().is_empty() {
            return Err("Task name cannot be empty".into());
        }
        if self.estimated_hours.is_finite() == false || self.estimated_hours < 0.0 {
            return Err(format!("Invalid estimated hours: {}", self.estimated_hours).into());
        }
        if self.difficulty == 0 {
            return Err("Difficulty must be at least 1".into());
        }
        if self.deadline < today {
            return Err("Deadline cannot be in the past".into());
        }
        if let Some(start) = self.start_date {
            if self.deadline < start {
                return Err(format!("Deadline {} is before start date {}", self.deadline, start).into());
            }
        }
        Ok(())
    }
}


/// A partial update of a task. Fields left to `None` are not changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<TaskType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
}



/// (De)serializes an optional date that the backend encodes as `""` when absent
mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
