//! This module provides ways to tweak mocked task sources, so that they can return errors on some tests
#![cfg(test)]

use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::task::{NewTask, Task, TaskEdit, TaskId};
use crate::traits::TaskSource;

/// How many calls of each operation succeed, then how many fail, on a [`MockSource`]
///
/// `(m, n)` lets `m` calls through, fails the `n` next ones, and lets every later call through.
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    pub get_tasks_behaviour: (u32, u32),
    pub create_task_behaviour: (u32, u32),
    pub delete_task_behaviour: (u32, u32),
    pub toggle_completion_behaviour: (u32, u32),
    pub update_task_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails its `n_fails` next calls
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            get_tasks_behaviour: (0, n_fails),
            create_task_behaviour: (0, n_fails),
            delete_task_behaviour: (0, n_fails),
            toggle_completion_behaviour: (0, n_fails),
            update_task_behaviour: (0, n_fails),
        }
    }

    pub fn can_get_tasks(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.get_tasks_behaviour, "get_tasks")
    }
    pub fn can_create_task(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.create_task_behaviour, "create_task")
    }
    pub fn can_delete_task(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.delete_task_behaviour, "delete_task")
    }
    pub fn can_toggle_completion(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.toggle_completion_behaviour, "toggle_completion")
    }
    pub fn can_update_task(&mut self) -> Result<(), Box<dyn Error>> {
        consume(&mut self.update_task_behaviour, "update_task")
    }
}

fn consume(allowance: &mut (u32, u32), operation: &str) -> Result<(), Box<dyn Error>> {
    match allowance {
        (0, 0) => Ok(()),
        (0, failures) => {
            *failures -= 1;
            log::debug!("Mocked {} fails ({} more to come)", operation, failures);
            Err(format!("Mocked {} failure", operation).into())
        },
        (successes, _) => {
            *successes -= 1;
            Ok(())
        },
    }
}



/// An in-memory task source, that behaves like the backend
#[derive(Default)]
pub struct MockSource {
    tasks: Mutex<Vec<Task>>,
    last_id: Mutex<u64>,
    pub behaviour: Mutex<MockBehaviour>,
}

impl MockSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        let last_id = tasks.iter()
            .filter_map(|task| task.id().as_remote())
            .max()
            .unwrap_or(0);
        Self {
            tasks: Mutex::new(tasks),
            last_id: Mutex::new(last_id),
            behaviour: Mutex::new(MockBehaviour::new()),
        }
    }

    pub fn with_behaviour(self, behaviour: MockBehaviour) -> Self {
        *self.behaviour.lock().unwrap() = behaviour;
        self
    }

    /// What the source currently stores
    pub fn stored(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskSource for MockSource {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_get_tasks()?;
        Ok(self.stored())
    }

    async fn create_task(&self, task: &NewTask) -> Result<TaskId, Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_create_task()?;
        let mut last_id = self.last_id.lock().unwrap();
        *last_id += 1;
        let id = TaskId::Remote(*last_id);
        let mut created = Task::new_local(task);
        created.set_id(id.clone());
        created.set_sync_status(Default::default());
        self.tasks.lock().unwrap().push(created);
        Ok(id)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_delete_task()?;
        let mut tasks = self.tasks.lock().unwrap();
        let count = tasks.len();
        tasks.retain(|task| task.id() != id);
        if tasks.len() == count {
            return Err(format!("No task {}", id).into());
        }
        Ok(())
    }

    async fn toggle_completion(&self, id: &TaskId) -> Result<bool, Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_toggle_completion()?;
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(format!("No task {}", id).into()),
            Some(task) => {
                let completed = task.completed() == false;
                task.set_completed(completed);
                task.set_sync_status(Default::default());
                Ok(completed)
            },
        }
    }

    async fn update_task(&self, id: &TaskId, edit: &TaskEdit) -> Result<(), Box<dyn Error>> {
        self.behaviour.lock().unwrap().can_update_task()?;
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(format!("No task {}", id).into()),
            Some(task) => {
                task.apply_edit(edit);
                task.set_sync_status(Default::default());
                Ok(())
            },
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_successes_then_failures() {
        let mut behaviour = MockBehaviour { delete_task_behaviour: (1, 2), ..MockBehaviour::default() };
        assert!(behaviour.can_delete_task().is_ok());
        assert!(behaviour.can_delete_task().is_err());
        assert!(behaviour.can_delete_task().is_err());
        assert!(behaviour.can_delete_task().is_ok());
        assert_eq!(behaviour.delete_task_behaviour, (0, 0));
        // other operations are not affected
        assert!(behaviour.can_get_tasks().is_ok());
    }

    #[tokio::test]
    async fn test_failing_source_keeps_its_tasks() {
        let source = MockSource::new(vec![]).with_behaviour(MockBehaviour::fail_now(1));
        let body = NewTask::custom("Essay".to_string(), chrono::NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(), 2.0);
        assert!(source.create_task(&body).await.is_err());
        assert!(source.stored().is_empty());

        assert_eq!(source.create_task(&body).await.unwrap(), TaskId::Remote(1));
        assert_eq!(source.get_tasks().await.unwrap_err().to_string(), "Mocked get_tasks failure");
        assert_eq!(source.get_tasks().await.unwrap().len(), 1);
    }
}
