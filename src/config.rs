//! Configuration types for netpalm-client

use crate::error::{Error, Result};
use crate::types::QueueStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result caching requested from the service on job submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Ask the service to cache command output (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long cached output stays valid (default: 300 seconds)
    #[serde(default = "default_cache_ttl", with = "duration_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_cache_ttl(),
        }
    }
}

/// Polling behaviour for task status checks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Sleep between status checks or batch rounds (default: 1 second)
    #[serde(default = "default_poll_interval", with = "duration_serde")]
    pub interval: Duration,

    /// Overall bound for a single-task poll (default: 30 seconds)
    #[serde(default = "default_poll_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Per-task bound inside a batch poll (None = wait indefinitely)
    ///
    /// A task still pending after this long is recorded as timed out and the
    /// rest of the batch carries on.
    #[serde(default, with = "optional_duration_serde")]
    pub task_timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            timeout: default_poll_timeout(),
            task_timeout: None,
        }
    }
}

/// Main configuration for [`NetpalmClient`](crate::NetpalmClient)
///
/// Secrets are not part of the configuration; they come from a
/// [`CredentialProvider`](crate::credentials::CredentialProvider).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the Netpalm API, e.g. `https://netpalm.example.org`
    pub url: String,

    /// Result caching directives
    #[serde(default)]
    pub cache: CacheConfig,

    /// Queue strategy used when a submission does not name one (default: pinned)
    #[serde(default)]
    pub default_queue_strategy: QueueStrategy,

    /// Timeout applied to every HTTP request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Task polling settings
    #[serde(default)]
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            cache: CacheConfig::default(),
            default_queue_strategy: QueueStrategy::default(),
            request_timeout: default_request_timeout(),
            poll: PollConfig::default(),
        }
    }

    /// Check the configuration for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| Error::config(format!("invalid base URL '{}': {}", self.url, e), "url"))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(
                format!("base URL must be http or https, got '{}'", parsed.scheme()),
                "url",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::config(
                "request timeout must be greater than zero",
                "request_timeout",
            ));
        }

        if self.poll.interval.is_zero() {
            return Err(Error::config(
                "poll interval must be greater than zero",
                "poll.interval",
            ));
        }

        Ok(())
    }

    /// Base URL without trailing slashes
    pub(crate) fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(300)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
