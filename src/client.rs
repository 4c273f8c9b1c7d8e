//! This module provides a client to connect to the study-planner backend

use std::error::Error;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::keypoint::KeyPoint;
use crate::task::{NewTask, Task, TaskEdit, TaskId};
use crate::traits::TaskSource;


/// What the backend replies to mutations
#[derive(Debug, Deserialize)]
struct Ack {
    status: String,
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

impl Ack {
    /// Turns a `{"status": "error"}` reply into an error
    fn check(self, action: &str) -> Result<Self, Box<dyn Error>> {
        if self.status == "success" {
            return Ok(self);
        }
        match &self.message {
            Some(message) => Err(format!("The backend refused to {}: {}", action, message).into()),
            None => Err(format!("The backend refused to {} (status {:?})", action, self.status).into()),
        }
    }
}

fn check_status(response: Response) -> Result<Response, Box<dyn Error>> {
    if response.status().is_success() == false {
        return Err(format!("Unexpected HTTP status code {:?} for {}", response.status(), response.url()).into());
    }
    Ok(response)
}

fn remote_id(id: &TaskId) -> Result<u64, Box<dyn Error>> {
    match id.as_remote() {
        Some(remote) => Ok(remote),
        None => Err(format!("Task {} is not known to the backend yet", id).into()),
    }
}


/// A task source that fetches its data from the study-planner backend
pub struct Client {
    url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new<S: AsRef<str>>(url: S) -> Result<Self, Box<dyn Error>> {
        let mut url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base() {
            return Err(format!("{} cannot be used as a base URL", url).into());
        }
        // endpoints are joined relatively to the base URL
        if url.path().ends_with('/') == false {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()?;

        Ok(Self { url, http })
    }

    /// Create a client for [`config::BACKEND_URL`](crate::config::BACKEND_URL)
    pub fn from_default_url() -> Result<Self, Box<dyn Error>> {
        Self::new(crate::config::backend_url())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.url.join(path)?)
    }

    /// Open a session. The session cookie is kept for the following requests
    pub async fn login(&self, username: &str, password: &str) -> Result<(), Box<dyn Error>> {
        let url = self.endpoint("login")?;
        let response = self.http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let response = check_status(response)?;

        // A successful login redirects away from the login page
        if response.url().path().trim_end_matches('/').ends_with("/login") {
            return Err(format!("Invalid credentials for user {}", username).into());
        }
        log::info!("Logged in as {}", username);
        Ok(())
    }

    /// Download every task as a CSV file. Its content is not interpreted.
    pub async fn export_csv(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        let url = self.endpoint("export/csv")?;
        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    pub async fn get_keypoints(&self) -> Result<Vec<KeyPoint>, Box<dyn Error>> {
        let url = self.endpoint("api/keypoints")?;
        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;
        let keypoints = response.json().await?;
        Ok(keypoints)
    }

    pub async fn add_keypoint(&self, content: &str) -> Result<KeyPoint, Box<dyn Error>> {
        if content.trim().is_empty() {
            return Err("Key point content cannot be empty".into());
        }
        let url = self.endpoint("api/keypoints")?;
        let response = self.http
            .post(url)
            .json(&json!({ "content": content }))
            .send()
            .await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        let ack = ack.check("add a key point")?;
        match ack.id {
            None => Err("The backend did not return the ID of the new key point".into()),
            Some(id) => Ok(KeyPoint::new(id, content.to_string())),
        }
    }

    pub async fn delete_keypoint(&self, id: u64) -> Result<(), Box<dyn Error>> {
        let url = self.endpoint("api/keypoints")?;
        let response = self.http
            .delete(url)
            .json(&json!({ "id": id }))
            .send()
            .await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        ack.check("delete a key point")?;
        Ok(())
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn get_tasks(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let url = self.endpoint("api/tasks")?;
        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;
        let raw_tasks: Vec<serde_json::Value> = response.json().await?;

        let mut tasks = Vec::with_capacity(raw_tasks.len());
        for raw_task in raw_tasks {
            match serde_json::from_value::<Task>(raw_task) {
                Err(err) => {
                    log::warn!("Ignoring a malformed task: {}", err);
                    continue;
                },
                Ok(task) => tasks.push(task),
            }
        }
        log::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn create_task(&self, task: &NewTask) -> Result<TaskId, Box<dyn Error>> {
        let url = self.endpoint("api/tasks")?;
        let response = self.http
            .post(url)
            .json(task)
            .send()
            .await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        let ack = ack.check("create a task")?;
        match ack.id {
            None => Err("The backend did not return the ID of the new task".into()),
            Some(id) => {
                log::info!("Created task {} ({})", id, task.name);
                Ok(TaskId::Remote(id))
            },
        }
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), Box<dyn Error>> {
        let remote = remote_id(id)?;
        let url = self.endpoint("api/tasks")?;
        let response = self.http
            .delete(url)
            .json(&json!({ "id": remote }))
            .send()
            .await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        ack.check("delete a task")?;
        log::info!("Deleted task {}", id);
        Ok(())
    }

    async fn toggle_completion(&self, id: &TaskId) -> Result<bool, Box<dyn Error>> {
        let remote = remote_id(id)?;
        let url = self.endpoint(&format!("api/tasks/{}/complete", remote))?;
        let response = self.http.post(url).send().await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        let ack = ack.check("toggle a task")?;
        match ack.completed {
            None => Err(format!("The backend did not return the completion status of task {}", id).into()),
            Some(completed) => Ok(completed),
        }
    }

    async fn update_task(&self, id: &TaskId, edit: &TaskEdit) -> Result<(), Box<dyn Error>> {
        let remote = remote_id(id)?;
        let url = self.endpoint(&format!("api/tasks/{}", remote))?;
        let response = self.http
            .put(url)
            .json(edit)
            .send()
            .await?;
        let response = check_status(response)?;
        let ack: Ack = response.json().await?;
        ack.check("update a task")?;
        Ok(())
    }
}
