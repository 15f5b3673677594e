// Copyright 2026 Dmitry Tantsur <dtantsur@protonmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Long-running tasks.

use std::cmp;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tokio::time::{sleep, Instant};

use super::{Connection, Error, ErrorKind};

const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// State of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Task was just created.
    New,
    /// Task is starting.
    Starting,
    /// Task is waiting to be run.
    Pending,
    /// Task is running.
    Running,
    /// Task is suspended.
    Suspended,
    /// Task is being stopped.
    Stopping,
    /// Task has completed successfully.
    Completed,
    /// Task has completed with warnings.
    Warning,
    /// Task has failed.
    Error,
    /// Task was terminated.
    Terminated,
    /// Task was killed.
    Killed,
    /// Unknown task state.
    Unknown,
}

impl Default for TaskState {
    fn default() -> TaskState {
        TaskState::Unknown
    }
}

impl TaskState {
    /// Whether the task is still in progress.
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            TaskState::New
                | TaskState::Starting
                | TaskState::Pending
                | TaskState::Running
                | TaskState::Suspended
                | TaskState::Stopping
        )
    }

    /// Whether the task has reached a final state.
    #[inline]
    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    /// Whether the task has reached a failed state.
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            TaskState::Error | TaskState::Terminated | TaskState::Killed
        )
    }
}

impl<T> From<T> for TaskState
where
    T: Into<String>,
{
    fn from(value: T) -> TaskState {
        match value.into().to_lowercase().as_ref() {
            "new" => TaskState::New,
            "starting" => TaskState::Starting,
            "pending" => TaskState::Pending,
            "running" => TaskState::Running,
            "suspended" => TaskState::Suspended,
            "stopping" => TaskState::Stopping,
            "completed" => TaskState::Completed,
            "warning" => TaskState::Warning,
            "error" => TaskState::Error,
            "terminated" => TaskState::Terminated,
            "killed" => TaskState::Killed,
            _ => TaskState::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D>(deserializer: D) -> Result<TaskState, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: Option<String> = Deserialize::deserialize(deserializer)?;
        Ok(value.map(TaskState::from).unwrap_or_default())
    }
}

/// Resource associated with a task.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedResource {
    /// URI of the resource.
    #[serde(default)]
    pub resource_uri: Option<String>,
    /// Name of the resource.
    #[serde(default)]
    pub resource_name: Option<String>,
    /// Category of the resource (e.g. `ethernet-networks`).
    #[serde(default)]
    pub resource_category: Option<String>,
}

/// An error reported by a task.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskError {
    /// Error code.
    #[serde(default)]
    pub error_code: Option<String>,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Additional details.
    #[serde(default)]
    pub details: Option<String>,
}

/// A long-running task.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task URI.
    pub uri: String,
    /// Task name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current state.
    #[serde(default)]
    pub task_state: TaskState,
    /// Human-readable status.
    #[serde(default)]
    pub task_status: Option<String>,
    /// Progress in percents.
    #[serde(default)]
    pub percent_complete: Option<u8>,
    /// Resource the task operates on.
    #[serde(default)]
    pub associated_resource: Option<AssociatedResource>,
    /// Errors reported by the task.
    #[serde(default)]
    pub task_errors: Vec<TaskError>,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the JSON body describes a task.
    pub fn is_task(value: &Value) -> bool {
        value.get("category").and_then(Value::as_str) == Some("tasks")
            && value.get("uri").map(Value::is_string).unwrap_or(false)
    }

    /// URI of the associated resource, if any.
    #[inline]
    pub fn resource_uri(&self) -> Option<&str> {
        self.associated_resource
            .as_ref()
            .and_then(|r| r.resource_uri.as_deref())
    }

    fn error_message(&self) -> String {
        let messages: Vec<&str> = self
            .task_errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .collect();
        if messages.is_empty() {
            format!(
                "Task {} finished in state {:?}: {}",
                self.uri,
                self.task_state,
                self.task_status.as_deref().unwrap_or("no status")
            )
        } else {
            format!("Task {} failed: {}", self.uri, messages.join("; "))
        }
    }
}

#[async_trait]
pub(crate) trait FetchTask {
    async fn fetch_task(&self, uri: &str) -> Result<Task, Error>;
}

#[async_trait]
impl FetchTask for Connection {
    async fn fetch_task(&self, uri: &str) -> Result<Task, Error> {
        self.get_json(uri).await
    }
}

/// Poll the task until it finishes.
pub(crate) async fn wait_for<F>(
    fetcher: &F,
    mut task: Task,
    timeout: Option<Duration>,
) -> Result<Task, Error>
where
    F: FetchTask + Sync + ?Sized,
{
    // A timeout too large to represent means no deadline.
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
    let mut delay = MIN_POLL_INTERVAL;

    while task.task_state.is_running() {
        let mut pause = delay;
        if let Some(deadline) = deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(Error::new(
                    ErrorKind::OperationTimedOut,
                    format!(
                        "Waited {} seconds for task {} to complete, aborting",
                        timeout.unwrap_or_default().as_secs(),
                        task.uri
                    ),
                ));
            }
            pause = cmp::min(pause, deadline - now);
        }

        trace!(
            "Task {} is {:?} ({}%), checking again in {:?}",
            task.uri,
            task.task_state,
            task.percent_complete.unwrap_or(0),
            pause
        );
        sleep(pause).await;
        task = fetcher.fetch_task(&task.uri).await?;
        delay = cmp::min(delay * 2, MAX_POLL_INTERVAL);
    }

    if task.task_state.is_failed() {
        return Err(Error::new(ErrorKind::OperationFailed, task.error_message()));
    }

    match task.task_state {
        TaskState::Completed => debug!("Task {} completed", task.uri),
        other => warn!(
            "Task {} finished in state {:?}: {}",
            task.uri,
            other,
            task.task_status.as_deref().unwrap_or("no status")
        ),
    }

    Ok(task)
}

/// Monitor of long-running tasks.
#[derive(Debug, Clone)]
pub struct TaskMonitor {
    connection: Connection,
}

impl TaskMonitor {
    /// Create a task monitor.
    pub fn new(connection: Connection) -> TaskMonitor {
        TaskMonitor { connection }
    }

    /// Fetch the current state of a task.
    pub async fn get<S: AsRef<str>>(&self, task_uri: S) -> Result<Task, Error> {
        self.connection.fetch_task(task_uri.as_ref()).await
    }

    /// Wait for the task to finish.
    ///
    /// Fails with `OperationFailed` if the task ends up in `Error`, `Terminated` or `Killed`
    /// state, and with `OperationTimedOut` if `timeout` is reached. A `timeout` of `None` means
    /// waiting indefinitely.
    pub async fn wait_for_task(&self, task: Task, timeout: Option<Duration>) -> Result<Task, Error> {
        wait_for(&self.connection, task, timeout).await
    }

    /// Fetch a task by its URI and wait for it to finish.
    pub async fn get_completed_task<S: AsRef<str>>(
        &self,
        task_uri: S,
        timeout: Option<Duration>,
    ) -> Result<Task, Error> {
        let task = self.get(task_uri).await?;
        self.wait_for_task(task, timeout).await
    }

    /// Fetch the resource associated with a task.
    pub async fn get_associated_resource<T>(&self, task: &Task) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        let uri = task.resource_uri().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidResponse,
                format!("Task {} has no associated resource", task.uri),
            )
        })?;
        self.connection.get_json(uri).await
    }

    /// Wait for the task to finish and fetch its associated resource.
    pub async fn wait_for_resource<T>(&self, task: Task, timeout: Option<Duration>) -> Result<T, Error>
    where
        T: DeserializeOwned + Send,
    {
        let task = self.wait_for_task(task, timeout).await?;
        self.get_associated_resource(&task).await
    }
}
