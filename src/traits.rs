use std::error::Error;

use async_trait::async_trait;

use crate::task::{NewTask, Task, TaskEdit, TaskId};

/// Something that stores tasks, usually the backend reached through a [`Client`](crate::client::Client)
#[async_trait]
pub trait TaskSource {
    /// Returns every task of the current user
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>>;

    /// Create a task, and returns the ID the source gave it
    async fn create_task(&self, task: &NewTask) -> Result<TaskId, Box<dyn Error>>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>>;

    /// Flip the whole-task completion flag, and returns its new value
    async fn toggle_completion(&self, id: &TaskId) -> Result<bool, Box<dyn Error>>;

    /// Apply a partial update to a task
    async fn update_task(&self, id: &TaskId, edit: &TaskEdit) -> Result<(), Box<dyn Error>>;
}
