//! Shared test helpers: a scripted in-memory transport and client factory.

use crate::client::NetpalmClient;
use crate::config::ClientConfig;
use crate::credentials::{DeviceCredentials, StaticCredentials};
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, RawResponse, Transport};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One canned reply
#[derive(Clone, Debug)]
pub(crate) enum Reply {
    /// 2xx with a body
    Body { status: u16, body: Vec<u8> },
    /// The request never reached the service
    ConnectionFailure,
}

impl Reply {
    pub(crate) fn json(value: Value) -> Self {
        Reply::Body {
            status: 200,
            body: value.to_string().into_bytes(),
        }
    }

    pub(crate) fn raw(status: u16, body: &[u8]) -> Self {
        Reply::Body {
            status,
            body: body.to_vec(),
        }
    }

    /// Envelope for a `task/{id}` check
    pub(crate) fn task(id: &str, status: &str) -> Self {
        Self::json(json!({
            "status": "success",
            "data": {
                "task_id": id,
                "created_on": "2024-01-01 10:00:00",
                "task_queue": "192.168.0.1",
                "task_status": status,
                "task_result": null,
                "task_errors": []
            }
        }))
    }

    /// Envelope for a finished task with output for `command`
    pub(crate) fn finished(id: &str, command: &str, output: Value) -> Self {
        Self::json(json!({
            "status": "success",
            "data": {
                "task_id": id,
                "task_status": "finished",
                "task_result": {command: output},
                "task_errors": []
            }
        }))
    }

    /// Envelope for a failed task carrying service error detail
    pub(crate) fn failed(id: &str, errors: Value) -> Self {
        Self::json(json!({
            "status": "success",
            "data": {
                "task_id": id,
                "task_status": "failed",
                "task_result": null,
                "task_errors": errors
            }
        }))
    }
}

/// Transport answering from per-endpoint scripts
///
/// Each endpoint's replies are consumed in order; the last reply repeats
/// forever. Every request is recorded.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, endpoint: &str, replies: impl IntoIterator<Item = Reply>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), replies.into_iter().collect());
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Endpoints in the order they were requested
    pub(crate) fn endpoints(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.endpoint).collect()
    }

    pub(crate) fn count(&self, endpoint: &str) -> usize {
        self.endpoints().iter().filter(|e| *e == endpoint).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        self.log.lock().unwrap().push(request.clone());

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            let queue = scripts
                .get_mut(&request.endpoint)
                .unwrap_or_else(|| panic!("no script for endpoint {}", request.endpoint));
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match reply {
            Some(Reply::Body { status, body }) => Ok(RawResponse { status, body }),
            Some(Reply::ConnectionFailure) => Err(Error::Connection {
                method: request.method.as_str(),
                endpoint: request.endpoint.clone(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "scripted connection failure",
                )),
            }),
            None => panic!("empty script for endpoint {}", request.endpoint),
        }
    }

    fn base_url(&self) -> &str {
        "http://scripted.test"
    }
}

/// Config with short polling intervals suitable for tests
pub(crate) fn test_config() -> ClientConfig {
    let mut config = ClientConfig::new("http://scripted.test");
    config.poll.interval = Duration::from_millis(10);
    config.poll.timeout = Duration::from_secs(5);
    config
}

pub(crate) fn test_credentials() -> Arc<StaticCredentials> {
    Arc::new(
        StaticCredentials::new("test-key")
            .with_device(DeviceCredentials::new("automation", "hunter2")),
    )
}

pub(crate) fn test_client(transport: ScriptedTransport) -> NetpalmClient<ScriptedTransport> {
    NetpalmClient::with_transport(test_config(), transport, test_credentials())
}
