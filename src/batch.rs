//! Multi-host command batches
//!
//! [`HostBatch::submit`] queues one job per host before anything is polled,
//! giving the service the chance to run them side by side. Only a fully
//! submitted batch can be collected, so submission and polling never
//! interleave.

use crate::client::{NetmikoGetConfig, NetpalmClient};
use crate::error::Result;
use crate::extract::{Extracted, extract};
use crate::transport::Transport;
use crate::types::{TaskId, TaskStatus};
use std::collections::{BTreeMap, HashMap};

/// Outcome for one host of a collected batch
#[derive(Clone, Debug, PartialEq)]
pub struct HostResult {
    /// Task that ran the command for this host
    pub task_id: TaskId,
    /// Terminal status; a task the poller gave up on counts as failed
    pub status: TaskStatus,
    /// Command output, or the error detail in its place
    pub result: Extracted,
}

/// Jobs submitted for a set of hosts, not yet collected
#[derive(Clone, Debug)]
pub struct HostBatch {
    command: String,
    host_to_task: BTreeMap<String, TaskId>,
    task_to_host: HashMap<TaskId, String>,
}

impl HostBatch {
    /// Submit `template` once per distinct host
    ///
    /// Hosts are submitted in order; a repeated host is submitted once.
    ///
    /// # Errors
    /// The first failed submission aborts the batch. Jobs already accepted by
    /// the service keep running.
    pub async fn submit<T, I, H>(
        client: &NetpalmClient<T>,
        template: &NetmikoGetConfig,
        hosts: I,
    ) -> Result<Self>
    where
        T: Transport,
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        let mut batch = Self {
            command: template.command.clone(),
            host_to_task: BTreeMap::new(),
            task_to_host: HashMap::new(),
        };

        for host in hosts {
            let host = host.into();
            if batch.host_to_task.contains_key(&host) {
                continue;
            }

            let task_id = client
                .netmiko_getconfig(&template.for_host(host.as_str()))
                .await
                .inspect_err(|e| {
                    tracing::warn!(
                        host = %host,
                        submitted = batch.host_to_task.len(),
                        error = %e,
                        "batch submission failed"
                    );
                })?;

            tracing::info!(host = %host, task_id = %task_id, "submitted");
            batch.task_to_host.insert(task_id.clone(), host.clone());
            batch.host_to_task.insert(host, task_id);
        }

        Ok(batch)
    }

    /// Command every job runs
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Number of submitted hosts
    pub fn len(&self) -> usize {
        self.host_to_task.len()
    }

    /// Whether no host was submitted
    pub fn is_empty(&self) -> bool {
        self.host_to_task.is_empty()
    }

    /// Task submitted for `host`
    pub fn task_for(&self, host: &str) -> Option<&TaskId> {
        self.host_to_task.get(host)
    }

    /// Host a task was submitted for
    pub fn host_for(&self, task_id: &TaskId) -> Option<&str> {
        self.task_to_host.get(task_id).map(String::as_str)
    }

    /// Every submitted task identifier
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.host_to_task.values()
    }

    /// Poll every task to completion and key the extracted results by host
    ///
    /// Uses the client's poll settings; set `poll.task_timeout` to stop one
    /// unreachable host from holding up the rest.
    pub async fn collect<T: Transport>(
        self,
        client: &NetpalmClient<T>,
        label: &str,
    ) -> Result<BTreeMap<String, HostResult>> {
        let outcomes = client
            .poll_tasks(self.host_to_task.values().cloned(), label)
            .await?;

        let mut results = BTreeMap::new();
        for (task_id, outcome) in outcomes {
            let Some(host) = self.task_to_host.get(&task_id) else {
                continue;
            };
            let result = extract(&outcome, &self.command);
            if !result.is_output() {
                tracing::warn!(host = %host, task_id = %task_id, "got error for host");
            }
            results.insert(
                host.clone(),
                HostResult {
                    task_id,
                    status: outcome.status(),
                    result,
                },
            );
        }

        Ok(results)
    }
}
