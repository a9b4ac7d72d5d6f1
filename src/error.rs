//! Error types for netpalm-client
//!
//! Every failure the client can raise is a variant of [`Error`]. The variants
//! follow the order in which a request can go wrong:
//! - the request never got a usable HTTP response (connection, HTTP status)
//! - the body could not be decoded
//! - the envelope was decoded but reports an invalid, failed or empty result
//! - a polled task did not finish in time
//!
//! A task that stays pending during a *batch* poll is not an error; it is
//! recorded as [`TaskOutcome::TimedOut`](crate::types::TaskOutcome) instead.

use std::time::Duration;
use thiserror::Error;

use crate::types::TaskId;

/// Result type alias for netpalm-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for netpalm-client
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "url")
        key: Option<String>,
    },

    /// Credentials could not be obtained from the provider
    #[error("credential error: {0}")]
    Credentials(String),

    /// The request could not be sent or no response was received
    #[error("connection error {method}ing {endpoint}: {source}")]
    Connection {
        /// HTTP method of the failed request
        method: &'static str,
        /// Endpoint relative to the base URL
        endpoint: String,
        /// Underlying transport failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The service answered with a non-success HTTP status
    #[error("got HTTP {status} {method}ing {endpoint}: {body}")]
    HttpStatus {
        /// HTTP method of the failed request
        method: &'static str,
        /// Endpoint relative to the base URL
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The response body was not valid JSON
    #[error("could not decode JSON {method}ing {endpoint}: {content}")]
    Decode {
        /// HTTP method of the request
        method: &'static str,
        /// Endpoint relative to the base URL
        endpoint: String,
        /// Response body, truncated
        content: String,
    },

    /// The envelope carried a service status outside the known enumeration
    #[error("got invalid status {status:?} for {endpoint}")]
    InvalidStatus {
        /// Endpoint relative to the base URL
        endpoint: String,
        /// The raw status, `None` when the field was absent
        status: Option<String>,
    },

    /// The envelope carried a known status that reports failure
    #[error("got failed status '{status}' for {endpoint}")]
    StatusFailed {
        /// Endpoint relative to the base URL
        endpoint: String,
        /// The failed status
        status: String,
    },

    /// The call succeeded but produced no payload
    #[error("got no data in response for {endpoint}: {response}")]
    NoData {
        /// Endpoint relative to the base URL
        endpoint: String,
        /// The full decoded response
        response: String,
    },

    /// A task reported a status outside the known task-status enumeration
    #[error("task status {status:?} from {endpoint} is not valid")]
    InvalidTaskStatus {
        /// Endpoint relative to the base URL
        endpoint: String,
        /// The raw status, `None` when the field was absent
        status: Option<String>,
    },

    /// A polled task did not reach a terminal status in time
    #[error("timeout of {timeout:?} exceeded waiting for task {task_id}")]
    Timeout {
        /// The task being polled
        task_id: TaskId,
        /// The bound that was exceeded
        timeout: Duration,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the failure happened before a usable response was received
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. } | Error::HttpStatus { .. })
    }

    /// Whether a task poll gave up waiting
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Whether the service answered but the envelope failed strict checking
    pub fn is_status_failure(&self) -> bool {
        matches!(
            self,
            Error::InvalidStatus { .. }
                | Error::StatusFailed { .. }
                | Error::NoData { .. }
                | Error::InvalidTaskStatus { .. }
        )
    }

    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Longest response excerpt carried inside an error message
pub(crate) const BODY_PREVIEW_LIMIT: usize = 512;

/// Lossy UTF-8 preview of a response body for error messages
pub(crate) fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= BODY_PREVIEW_LIMIT {
        return text.into_owned();
    }
    let mut cut: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();
    cut.push_str("...");
    cut
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn connection_error() -> Error {
        Error::Connection {
            method: "GET",
            endpoint: "task/abc".to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )),
        }
    }

    #[test]
    fn transport_failures_classify_as_connection() {
        assert!(connection_error().is_connection());
        assert!(
            Error::HttpStatus {
                method: "POST",
                endpoint: "getconfig".to_string(),
                status: 401,
                body: String::new(),
            }
            .is_connection()
        );
        assert!(
            !Error::Decode {
                method: "GET",
                endpoint: "task/abc".to_string(),
                content: "<html>".to_string(),
            }
            .is_connection()
        );
    }

    #[test]
    fn envelope_failures_classify_as_status_failures() {
        let failures = [
            Error::InvalidStatus {
                endpoint: "e".into(),
                status: None,
            },
            Error::StatusFailed {
                endpoint: "e".into(),
                status: "error".into(),
            },
            Error::NoData {
                endpoint: "e".into(),
                response: "{}".into(),
            },
            Error::InvalidTaskStatus {
                endpoint: "e".into(),
                status: Some("lost".into()),
            },
        ];
        for failure in failures {
            assert!(failure.is_status_failure(), "{failure} should be a status failure");
            assert!(!failure.is_connection());
            assert!(!failure.is_timeout());
        }
    }

    #[test]
    fn timeout_message_names_task_and_bound() {
        let err = Error::Timeout {
            task_id: TaskId::new("abc-123"),
            timeout: Duration::from_secs(30),
        };
        assert!(err.is_timeout());
        let msg = err.to_string();
        assert!(msg.contains("abc-123"), "{msg}");
        assert!(msg.contains("30s"), "{msg}");
    }

    #[test]
    fn connection_error_keeps_source() {
        use std::error::Error as _;
        let err = connection_error();
        assert_eq!(err.source().unwrap().to_string(), "refused");
        assert!(err.to_string().starts_with("connection error GETing task/abc"));
    }

    #[test]
    fn preview_truncates_long_bodies() {
        assert_eq!(preview(b"short"), "short");

        let long = vec![b'x'; BODY_PREVIEW_LIMIT + 10];
        let cut = preview(&long);
        assert_eq!(cut.len(), BODY_PREVIEW_LIMIT + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn preview_is_lossy_on_invalid_utf8() {
        assert_eq!(preview(&[0x66, 0xff, 0x6f]), "f\u{fffd}o");
    }
}
