//! Task status checks and polling.
//!
//! A single-task poll returns the terminal response or fails with
//! [`Error::Timeout`]. A batch poll never fails on a slow task: with a
//! per-task bound configured, a task still pending past the bound is recorded
//! as [`TaskOutcome::TimedOut`] and the rest of the batch carries on.

use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, Method, Transport};
use crate::types::{TaskId, TaskOutcome, TaskResponse, TaskStatus};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::time::Instant;

use super::NetpalmClient;

/// Endpoint listing queued task identifiers
pub const TASK_QUEUE_ENDPOINT: &str = "taskqueue";

fn task_endpoint(task_id: &TaskId) -> String {
    format!("task/{task_id}")
}

impl<T: Transport> NetpalmClient<T> {
    /// Fetch the current status of one task
    ///
    /// # Errors
    /// Fails on transport or decode errors, on a failed service status, and
    /// with [`Error::InvalidTaskStatus`] when the task status is unknown.
    pub async fn check_task(&self, task_id: &TaskId) -> Result<TaskResponse> {
        let endpoint = task_endpoint(task_id);
        let request = ApiRequest::new(Method::Get, endpoint.clone());
        let data = self.request_data(&request, true).await?;

        let Value::Object(mut fields) = data else {
            return Err(Error::InvalidTaskStatus {
                endpoint,
                status: None,
            });
        };

        let raw_status = fields.get("task_status").and_then(Value::as_str);
        if raw_status.and_then(|s| s.parse::<TaskStatus>().ok()).is_none() {
            return Err(Error::InvalidTaskStatus {
                endpoint,
                status: raw_status.map(str::to_string),
            });
        }

        fields
            .entry("task_id")
            .or_insert_with(|| Value::String(task_id.to_string()));

        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Poll one task until it finishes or fails, using the configured interval
    /// and timeout
    pub async fn poll_task(&self, task_id: &TaskId) -> Result<TaskResponse> {
        self.poll_task_with(task_id, &self.config.poll).await
    }

    /// Poll one task with explicit settings
    ///
    /// Returns the full terminal response, including failed tasks.
    ///
    /// # Errors
    /// [`Error::Timeout`] once `poll.timeout` has elapsed without a terminal
    /// status; any error from [`check_task`](Self::check_task).
    pub async fn poll_task_with(
        &self,
        task_id: &TaskId,
        poll: &PollConfig,
    ) -> Result<TaskResponse> {
        let started = Instant::now();

        loop {
            if started.elapsed() >= poll.timeout {
                tracing::warn!(task_id = %task_id, timeout = ?poll.timeout, "task poll timed out");
                return Err(Error::Timeout {
                    task_id: task_id.clone(),
                    timeout: poll.timeout,
                });
            }

            let response = self.check_task(task_id).await?;
            tracing::debug!(task_id = %task_id, status = %response.task_status, "got status");
            if response.is_done() {
                return Ok(response);
            }

            tokio::time::sleep(poll.interval).await;
        }
    }

    /// Poll many tasks until every one is terminal, using the configured
    /// interval and per-task bound
    ///
    /// `label` is attached to the progress log lines.
    pub async fn poll_tasks<I>(
        &self,
        task_ids: I,
        label: &str,
    ) -> Result<HashMap<TaskId, TaskOutcome>>
    where
        I: IntoIterator<Item = TaskId>,
    {
        self.poll_tasks_with(task_ids, &self.config.poll, label).await
    }

    /// Poll many tasks with explicit settings
    ///
    /// Duplicate identifiers collapse; the result has exactly one entry per
    /// distinct identifier. Every round checks each pending task once, and a
    /// task is never checked again after a terminal status was seen. With
    /// `poll.task_timeout` set, a task still pending once that long has passed
    /// since the batch started is recorded as [`TaskOutcome::TimedOut`];
    /// without it the call waits as long as it takes.
    ///
    /// # Errors
    /// Transport, decode and status errors abort the whole batch.
    pub async fn poll_tasks_with<I>(
        &self,
        task_ids: I,
        poll: &PollConfig,
        label: &str,
    ) -> Result<HashMap<TaskId, TaskOutcome>>
    where
        I: IntoIterator<Item = TaskId>,
    {
        let started = Instant::now();
        let mut pending: HashSet<TaskId> = task_ids.into_iter().collect();
        let total = pending.len();
        let mut finished: HashMap<TaskId, TaskOutcome> = HashMap::with_capacity(total);

        while !pending.is_empty() {
            let mut round: Vec<TaskId> = pending.iter().cloned().collect();
            round.sort();

            for task_id in round {
                let response = self.check_task(&task_id).await?;
                tracing::debug!(task_id = %task_id, status = %response.task_status, "got status");

                let outcome = if response.is_done() {
                    TaskOutcome::Completed(response)
                } else {
                    match poll.task_timeout {
                        Some(bound) if started.elapsed() >= bound => {
                            tracing::warn!(
                                label,
                                task_id = %task_id,
                                status = %response.task_status,
                                bound = ?bound,
                                "task still pending past its bound, marking failed"
                            );
                            TaskOutcome::TimedOut {
                                waited: started.elapsed(),
                            }
                        }
                        _ => continue,
                    }
                };

                pending.remove(&task_id);
                finished.insert(task_id, outcome);
            }

            if pending.is_empty() {
                break;
            }

            tracing::info!(label, unfinished = pending.len(), total, "tasks still unfinished");
            tokio::time::sleep(poll.interval).await;
        }

        Ok(finished)
    }

    /// Identifiers currently in the service's task queue
    pub async fn task_queue(&self) -> Result<Vec<TaskId>> {
        let request = ApiRequest::new(Method::Get, TASK_QUEUE_ENDPOINT);
        let data = self.request_data(&request, false).await?;

        let ids = data.get("task_id").cloned().ok_or_else(|| Error::NoData {
            endpoint: TASK_QUEUE_ENDPOINT.to_string(),
            response: data.to_string(),
        })?;

        Ok(serde_json::from_value(ids)?)
    }
}
