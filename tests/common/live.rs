//! Live-server configuration loaded from .env

use netpalm_client::credentials::ENV_API_KEY;
use netpalm_client::{ClientConfig, EnvCredentials, NetpalmClient};
use std::time::Duration;

/// Base URL of the live Netpalm instance
pub const ENV_URL: &str = "NETPALM_URL";
/// Device the live tests run commands against
pub const ENV_TEST_HOST: &str = "NETPALM_TEST_HOST";

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Whether a live Netpalm instance is configured
pub fn has_live_server() -> bool {
    dotenvy::dotenv().ok();
    std::env::var(ENV_URL).is_ok() && std::env::var(ENV_API_KEY).is_ok()
}

/// Device address for live command tests
pub fn live_test_host() -> Result<String, ConfigError> {
    dotenvy::dotenv().ok();
    std::env::var(ENV_TEST_HOST)
        .map_err(|_| ConfigError(format!("{ENV_TEST_HOST} not set in environment")))
}

/// Client for the live instance, credentials from the environment
pub fn create_live_client() -> Result<NetpalmClient, ConfigError> {
    dotenvy::dotenv().ok();

    let url = std::env::var(ENV_URL)
        .map_err(|_| ConfigError(format!("{ENV_URL} not set in environment")))?;

    let mut config = ClientConfig::new(url);
    config.poll.timeout = Duration::from_secs(60);
    config.poll.task_timeout = Some(Duration::from_secs(60));

    NetpalmClient::new(config, EnvCredentials::new()).map_err(|e| ConfigError(e.to_string()))
}
