//! Netpalm API client (decomposed into focused submodules)
//!
//! - [`requests`] - generic GET/POST/DELETE with envelope decoding
//! - [`submit`] - job submission (`getconfig`)
//! - [`poll`] - task status checks and single/batch polling

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;

pub mod poll;
pub mod requests;
pub mod submit;

pub use submit::{GetConfig, NetmikoGetConfig};

/// Client for the Netpalm task queue API
///
/// All calls are issued one at a time; the client holds no per-task state
/// between calls.
pub struct NetpalmClient<T = HttpTransport> {
    transport: T,
    credentials: Arc<dyn CredentialProvider>,
    config: ClientConfig,
}

impl NetpalmClient<HttpTransport> {
    /// Create a client talking HTTP to `config.url`
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created
    ///
    /// # Example
    ///
    /// ```no_run
    /// use netpalm_client::{ClientConfig, EnvCredentials, NetpalmClient};
    ///
    /// # fn example() -> netpalm_client::Result<()> {
    /// let client = NetpalmClient::new(
    ///     ClientConfig::new("https://netpalm.example.org"),
    ///     EnvCredentials::new(),
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(
        config: ClientConfig,
        credentials: impl CredentialProvider + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let credentials: Arc<dyn CredentialProvider> = Arc::new(credentials);
        let transport = HttpTransport::new(&config, credentials.clone())?;
        Ok(Self::with_transport(config, transport, credentials))
    }
}

impl<T: Transport> NetpalmClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(
        config: ClientConfig,
        transport: T,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        tracing::info!(
            url = %transport.base_url(),
            caching = if config.cache.enabled { "enabled" } else { "disabled" },
            "creating Netpalm client"
        );
        if config.cache.enabled {
            tracing::info!(ttl_secs = config.cache.ttl.as_secs(), "cache TTL set");
        }

        Self {
            transport,
            credentials,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }
}

impl<T: Transport> std::fmt::Debug for NetpalmClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetpalmClient")
            .field("url", &self.transport.base_url())
            .finish()
    }
}
