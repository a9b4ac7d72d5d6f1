//! Core types for netpalm-client

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Opaque identifier the service assigns to a submitted job
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a queued job, as reported by the service's task queue
///
/// `Finished` and `Failed` are terminal; every other status means the job is
/// still progressing through the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting in the queue
    Queued,
    /// Picked up by a worker
    Started,
    /// Waiting on a dependency
    Deferred,
    /// Scheduled for later execution
    Scheduled,
    /// Completed, result available
    Finished,
    /// Completed with an error
    Failed,
}

impl TaskStatus {
    /// Every status the service can report
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Queued,
        TaskStatus::Started,
        TaskStatus::Deferred,
        TaskStatus::Scheduled,
        TaskStatus::Finished,
        TaskStatus::Failed,
    ];

    /// Whether no further transition will occur
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Finished | TaskStatus::Failed)
    }

    /// Whether the job ended unsuccessfully
    pub fn is_failed(&self) -> bool {
        matches!(self, TaskStatus::Failed)
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Started => "started",
            TaskStatus::Deferred => "deferred",
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::Finished => "finished",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Outcome of a single API call, distinct from the status of the job it concerns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// The call was accepted
    Success,
    /// The call was rejected
    Error,
}

impl ServiceStatus {
    /// Whether the call succeeded
    pub fn is_ok(&self) -> bool {
        matches!(self, ServiceStatus::Success)
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Success => "success",
            ServiceStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ServiceStatus::Success),
            "error" => Ok(ServiceStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status string outside the known enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl std::fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// How the service assigns a job to a worker queue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStrategy {
    /// One worker queue per device (default)
    #[default]
    Pinned,
    /// Shared first-in first-out queue
    Fifo,
}

/// Caching directives attached to a job submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheDirectives {
    /// Whether the service may serve this command from cache
    pub enabled: bool,
    /// Cache lifetime in seconds
    pub ttl: u64,
    /// Invalidate any cached result before running
    pub poison: bool,
}

/// Status report for one task, the `data` of a `task/{id}` response
///
/// Fields the client does not interpret are kept in `extra` so a returned
/// response is the full payload the service sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// The task this report is about
    pub task_id: TaskId,

    /// Queue status at the time of the check
    pub task_status: TaskStatus,

    /// Command output keyed by command, once finished
    #[serde(default)]
    pub task_result: Value,

    /// Error detail reported by the service
    #[serde(default)]
    pub task_errors: Value,

    /// Any other fields (creation time, queue name, metadata)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TaskResponse {
    /// Whether the task will not change any further
    pub fn is_done(&self) -> bool {
        self.task_status.is_done()
    }
}

/// Terminal outcome recorded for one identifier of a batch poll
#[derive(Clone, Debug, PartialEq)]
pub enum TaskOutcome {
    /// The service reported a terminal status (finished or failed)
    Completed(TaskResponse),
    /// The identifier stayed pending past the per-task bound
    TimedOut {
        /// How long the identifier was polled before giving up
        waited: Duration,
    },
}

impl TaskOutcome {
    /// Terminal status of this outcome; a timeout counts as failed
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Completed(response) => response.task_status,
            TaskOutcome::TimedOut { .. } => TaskStatus::Failed,
        }
    }

    /// The service's response, if one was received
    pub fn response(&self) -> Option<&TaskResponse> {
        match self {
            TaskOutcome::Completed(response) => Some(response),
            TaskOutcome::TimedOut { .. } => None,
        }
    }

    /// Whether this outcome was synthesized by the poller
    pub fn is_timed_out(&self) -> bool {
        matches!(self, TaskOutcome::TimedOut { .. })
    }
}
