//! Job submission to the `getconfig` endpoint.

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, Method, Transport};
use crate::types::{CacheDirectives, QueueStrategy, TaskId};
use serde_json::{Map, Value, json};
use std::time::Duration;

use super::NetpalmClient;

/// Endpoint accepting command jobs
pub const GETCONFIG_ENDPOINT: &str = "getconfig";

/// Default device connection timeout for netmiko jobs
pub const DEFAULT_DEVICE_TIMEOUT: Duration = Duration::from_secs(5);

/// A `getconfig` job for any driver library
#[derive(Clone, Debug, PartialEq)]
pub struct GetConfig {
    /// Driver library on the service side (e.g. `netmiko`, `napalm`)
    pub library: String,
    /// Command to run on the device
    pub command: String,
    /// Library-specific connection arguments
    pub connection_args: Map<String, Value>,
    /// Library-specific call arguments
    pub library_args: Map<String, Value>,
    /// Queue strategy override (None = client default)
    pub queue_strategy: Option<QueueStrategy>,
    /// Invalidate any cached result first
    pub poison: bool,
}

/// A `getconfig` job through netmiko
///
/// Device login comes from the client's credential provider.
#[derive(Clone, Debug, PartialEq)]
pub struct NetmikoGetConfig {
    /// Command to run on the device
    pub command: String,
    /// Device address
    pub host: String,
    /// Netmiko device type, e.g. `cisco_ios`
    pub device_type: String,
    /// Parse output with TextFSM (default: true)
    pub use_textfsm: bool,
    /// Custom TextFSM template
    pub textfsm_template: Option<String>,
    /// Device connection timeout (default: 5 seconds)
    pub timeout: Duration,
    /// Queue strategy override (None = client default)
    pub queue_strategy: Option<QueueStrategy>,
    /// Invalidate any cached result first
    pub poison: bool,
}

impl NetmikoGetConfig {
    /// Job with default options
    pub fn new(
        command: impl Into<String>,
        host: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            host: host.into(),
            device_type: device_type.into(),
            use_textfsm: true,
            textfsm_template: None,
            timeout: DEFAULT_DEVICE_TIMEOUT,
            queue_strategy: None,
            poison: false,
        }
    }

    /// Same job against another host
    pub fn for_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self.clone()
        }
    }

    /// Set cache poisoning
    pub fn poison(mut self, poison: bool) -> Self {
        self.poison = poison;
        self
    }

    /// Override the queue strategy
    pub fn queue_strategy(mut self, strategy: QueueStrategy) -> Self {
        self.queue_strategy = Some(strategy);
        self
    }

    /// Toggle TextFSM parsing, optionally with a custom template
    pub fn textfsm(mut self, enabled: bool, template: Option<String>) -> Self {
        self.use_textfsm = enabled;
        self.textfsm_template = template;
        self
    }

    /// Set the device connection timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<T: Transport> NetpalmClient<T> {
    /// Submit a `getconfig` job and return its task identifier
    ///
    /// Not retried; a transport failure is returned as-is.
    pub async fn raw_getconfig(&self, job: &GetConfig) -> Result<TaskId> {
        let body = self.getconfig_body(job)?;
        let request = ApiRequest::new(Method::Post, GETCONFIG_ENDPOINT).with_body(body);
        let data = self.request_data(&request, true).await?;

        let task_id = data
            .get("task_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(TaskId::from)
            .ok_or_else(|| Error::NoData {
                endpoint: GETCONFIG_ENDPOINT.to_string(),
                response: data.to_string(),
            })?;

        tracing::debug!(
            task_id = %task_id,
            library = %job.library,
            command = %job.command,
            "submitted job"
        );
        Ok(task_id)
    }

    /// Submit a netmiko `getconfig` job and return its task identifier
    pub async fn netmiko_getconfig(&self, job: &NetmikoGetConfig) -> Result<TaskId> {
        let device_timeout = job.timeout.as_secs();
        let mut connection_args = Map::new();
        connection_args.insert("device_type".into(), json!(job.device_type));
        connection_args.insert("host".into(), json!(job.host));
        if let Some(device) = self.credentials().device_credentials()? {
            connection_args.insert("username".into(), json!(device.username));
            connection_args.insert("password".into(), json!(device.password));
        }
        connection_args.insert("timeout".into(), json!(device_timeout));
        connection_args.insert("conn_timeout".into(), json!(device_timeout));

        let mut library_args = Map::new();
        library_args.insert("use_textfsm".into(), json!(job.use_textfsm));
        library_args.insert("textfsm_template".into(), json!(job.textfsm_template));

        let generic = GetConfig {
            library: "netmiko".to_string(),
            command: job.command.clone(),
            connection_args,
            library_args,
            queue_strategy: job.queue_strategy,
            poison: job.poison,
        };

        self.raw_getconfig(&generic).await
    }

    fn getconfig_body(&self, job: &GetConfig) -> Result<Value> {
        let queue_strategy = job
            .queue_strategy
            .unwrap_or(self.config.default_queue_strategy);

        let mut body = Map::new();
        body.insert("library".into(), json!(job.library));
        body.insert("connection_args".into(), Value::Object(job.connection_args.clone()));
        body.insert("args".into(), Value::Object(job.library_args.clone()));
        body.insert("command".into(), json!(job.command));
        body.insert("queue_strategy".into(), serde_json::to_value(queue_strategy)?);

        if self.config.cache.enabled {
            let cache = CacheDirectives {
                enabled: true,
                ttl: self.config.cache.ttl.as_secs(),
                poison: job.poison,
            };
            body.insert("cache".into(), serde_json::to_value(cache)?);
        }

        Ok(Value::Object(body))
    }
}
