//! Credential sourcing
//!
//! The client never stores secrets itself. It asks a [`CredentialProvider`]
//! for the API key on every request and for device login details on every
//! job submission, so keys can be rotated or fetched from a vault without
//! rebuilding the client.

use crate::error::{Error, Result};

/// Login the service uses to reach a network device
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceCredentials {
    /// Device username
    pub username: String,
    /// Device password
    pub password: String,
}

impl DeviceCredentials {
    /// Create a new set of device credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of the secrets the client needs
///
/// Implementations must be cheap to call; the API key is requested once per
/// HTTP request.
pub trait CredentialProvider: Send + Sync {
    /// Value for the `x-api-key` header
    fn api_key(&self) -> Result<String>;

    /// Login forwarded to the device for job submissions
    ///
    /// `None` submits the job without a username or password, leaving the
    /// service to apply its own defaults.
    fn device_credentials(&self) -> Result<Option<DeviceCredentials>>;
}

/// Credentials held in memory
#[derive(Clone)]
pub struct StaticCredentials {
    api_key: String,
    device: Option<DeviceCredentials>,
}

impl StaticCredentials {
    /// API key only, no device login
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            device: None,
        }
    }

    /// Attach a device login
    pub fn with_device(mut self, device: DeviceCredentials) -> Self {
        self.device = Some(device);
        self
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("api_key", &"<redacted>")
            .field("device", &self.device)
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Result<String> {
        Ok(self.api_key.clone())
    }

    fn device_credentials(&self) -> Result<Option<DeviceCredentials>> {
        Ok(self.device.clone())
    }
}

/// Default environment variable holding the API key
pub const ENV_API_KEY: &str = "NETPALM_API_KEY";
/// Default environment variable holding the device username
pub const ENV_CLI_USER: &str = "NETPALM_CLI_USER";
/// Default environment variable holding the device password
pub const ENV_CLI_PASS: &str = "NETPALM_CLI_PASS";

/// Credentials read from environment variables at the time of each call
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    api_key_var: String,
    user_var: String,
    pass_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self {
            api_key_var: ENV_API_KEY.to_string(),
            user_var: ENV_CLI_USER.to_string(),
            pass_var: ENV_CLI_PASS.to_string(),
        }
    }
}

impl EnvCredentials {
    /// Read from `NETPALM_API_KEY`, `NETPALM_CLI_USER` and `NETPALM_CLI_PASS`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from custom variable names
    pub fn with_vars(
        api_key_var: impl Into<String>,
        user_var: impl Into<String>,
        pass_var: impl Into<String>,
    ) -> Self {
        Self {
            api_key_var: api_key_var.into(),
            user_var: user_var.into(),
            pass_var: pass_var.into(),
        }
    }

    fn read(var: &str) -> Result<Option<String>> {
        match std::env::var(var) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::Credentials(format!(
                "environment variable {var} is not valid unicode"
            ))),
        }
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Result<String> {
        Self::read(&self.api_key_var)?.ok_or_else(|| {
            Error::Credentials(format!(
                "environment variable {} is not set",
                self.api_key_var
            ))
        })
    }

    fn device_credentials(&self) -> Result<Option<DeviceCredentials>> {
        match (Self::read(&self.user_var)?, Self::read(&self.pass_var)?) {
            (Some(username), Some(password)) => Ok(Some(DeviceCredentials { username, password })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::Credentials(format!(
                "{} is set but {} is not",
                self.user_var, self.pass_var
            ))),
            (None, Some(_)) => Err(Error::Credentials(format!(
                "{} is set but {} is not",
                self.pass_var, self.user_var
            ))),
        }
    }
}
