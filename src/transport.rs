//! HTTP transport
//!
//! [`Transport`] is the seam between the client's request/poll logic and the
//! network. [`HttpTransport`] is the production implementation on `reqwest`;
//! tests substitute a scripted transport.

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::{Error, Result, preview};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP methods used by the Netpalm API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the API base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, without a leading slash
    pub endpoint: String,
    /// URL query parameters
    pub params: Vec<(String, String)>,
    /// JSON body, sent with POST and DELETE
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request with no parameters and no body
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params: Vec::new(),
            body: None,
        }
    }

    /// Attach query parameters
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A successful (2xx) HTTP response, body not yet decoded
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body bytes
    pub body: Vec<u8>,
}

/// Sends API requests to the service
///
/// Implementations return `Ok` only for 2xx responses; anything else is an
/// [`Error::Connection`] or [`Error::HttpStatus`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse>;

    /// Base URL requests are sent to, for logging
    fn base_url(&self) -> &str;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpTransport {
    /// Create a transport for the configured base URL
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("netpalm-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
            credentials,
        })
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let method = request.method.as_str();
        let api_key = self.credentials.api_key()?;

        let mut builder = self
            .http_client
            .request(request.method.into(), self.url_for(&request.endpoint))
            .header(API_KEY_HEADER, api_key)
            .query(&request.params);

        if request.method != Method::Get {
            let body = request
                .body
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default()));
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| Error::Connection {
            method,
            endpoint: request.endpoint.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| Error::Connection {
            method,
            endpoint: request.endpoint.clone(),
            source: Box::new(e),
        })?;

        if !status.is_success() {
            tracing::warn!(
                method,
                endpoint = %request.endpoint,
                status = status.as_u16(),
                "request rejected"
            );
            return Err(Error::HttpStatus {
                method,
                endpoint: request.endpoint.clone(),
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
