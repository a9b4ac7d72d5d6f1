//! # netpalm-client
//!
//! Async client library for the [Netpalm](https://github.com/tbotnz/netpalm)
//! network automation task queue.
//!
//! Netpalm runs device commands asynchronously: a submission returns a task
//! identifier, and the result is fetched by polling that task until it
//! finishes or fails. This crate wraps that cycle:
//!
//! - **Submit** - [`NetpalmClient::netmiko_getconfig`] and
//!   [`NetpalmClient::raw_getconfig`] queue a job and return its [`TaskId`]
//! - **Poll** - [`NetpalmClient::poll_task`] waits on one task,
//!   [`NetpalmClient::poll_tasks`] on many
//! - **Extract** - [`extract`] pulls the command output out of a terminal
//!   task, or the service's error detail when there is none
//! - **Batch** - [`HostBatch`] runs one command against many hosts, submitting
//!   every job before polling any of them
//!
//! ## Quick Start
//!
//! ```no_run
//! use netpalm_client::{ClientConfig, EnvCredentials, NetmikoGetConfig, NetpalmClient, extract};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NetpalmClient::new(
//!         ClientConfig::new("https://netpalm.example.org"),
//!         EnvCredentials::new(),
//!     )?;
//!
//!     let command = "show run | i bgp router-id";
//!     let job = NetmikoGetConfig::new(command, "192.168.0.1", "cisco_ios");
//!     let task_id = client.netmiko_getconfig(&job).await?;
//!
//!     let response = client.poll_task(&task_id).await?;
//!     println!("{:?}", extract::extract_response(&response, command));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Multi-host command batches
pub mod batch;
/// Netpalm API client
pub mod client;
/// Configuration types
pub mod config;
/// Credential providers
pub mod credentials;
/// Response envelope decoding
pub mod envelope;
/// Error types
pub mod error;
/// Result extraction
pub mod extract;
/// HTTP transport
pub mod transport;
/// Core types
pub mod types;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use batch::{HostBatch, HostResult};
pub use client::{GetConfig, NetmikoGetConfig, NetpalmClient};
pub use config::{CacheConfig, ClientConfig, PollConfig};
pub use credentials::{CredentialProvider, DeviceCredentials, EnvCredentials, StaticCredentials};
pub use error::{Error, Result};
pub use extract::Extracted;
pub use transport::{HttpTransport, Transport};
pub use types::{
    QueueStrategy, ServiceStatus, TaskId, TaskOutcome, TaskResponse, TaskStatus,
};
