//! Mock Netpalm server and client factory

use netpalm_client::{ClientConfig, DeviceCredentials, NetpalmClient, StaticCredentials};
use std::time::Duration;
use wiremock::MockServer;

/// API key the mock server expects
pub const API_KEY: &str = "abc-123-xyz";

/// Config pointing at `server` with fast polling
pub fn fast_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new(server.uri());
    config.poll.interval = Duration::from_millis(20);
    config.poll.timeout = Duration::from_secs(5);
    config
}

/// Client for `config` with the test API key and device login
pub fn client_with(config: ClientConfig) -> NetpalmClient {
    NetpalmClient::new(
        config,
        StaticCredentials::new(API_KEY)
            .with_device(DeviceCredentials::new("automation", "hunter2")),
    )
    .expect("client should build against mock server")
}

/// Client pointing at `server` with fast polling
pub fn client_for(server: &MockServer) -> NetpalmClient {
    client_with(fast_config(server))
}
