//! Generic API requests with envelope decoding.

use crate::envelope::Envelope;
use crate::error::{Error, Result, preview};
use crate::transport::{ApiRequest, Method, Transport};
use serde_json::Value;

use super::NetpalmClient;

fn owned_params(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl<T: Transport> NetpalmClient<T> {
    /// GET `endpoint` and return the envelope's data
    ///
    /// `strict` fails on an unknown or failed service status and on an empty
    /// payload; otherwise the whole response stands in for a missing `data`.
    /// Returns `None` for a `204 No Content` without a body.
    pub async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        strict: bool,
    ) -> Result<Option<Value>> {
        let request = ApiRequest::new(Method::Get, endpoint).with_params(owned_params(params));
        self.request(&request, strict).await
    }

    /// POST a JSON body to `endpoint` and return the envelope's data
    ///
    /// A missing body is sent as `{}`.
    pub async fn post(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<Value>,
        strict: bool,
    ) -> Result<Option<Value>> {
        let mut request = ApiRequest::new(Method::Post, endpoint).with_params(owned_params(params));
        request.body = body;
        self.request(&request, strict).await
    }

    /// DELETE `endpoint` and return the envelope's data
    pub async fn delete(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        body: Option<Value>,
        strict: bool,
    ) -> Result<Option<Value>> {
        let mut request =
            ApiRequest::new(Method::Delete, endpoint).with_params(owned_params(params));
        request.body = body;
        self.request(&request, strict).await
    }

    /// Send a prepared request and decode its envelope
    pub async fn request(&self, request: &ApiRequest, strict: bool) -> Result<Option<Value>> {
        let raw = self.transport.send(request).await?;

        let envelope = Envelope::from_body(&raw.body, raw.status).map_err(|e| {
            tracing::debug!(error = %e, endpoint = %request.endpoint, "undecodable response body");
            Error::Decode {
                method: request.method.as_str(),
                endpoint: request.endpoint.clone(),
                content: preview(&raw.body),
            }
        })?;

        let Some(envelope) = envelope else {
            tracing::debug!(endpoint = %request.endpoint, "no content");
            return Ok(None);
        };

        envelope.into_data(&request.endpoint, strict).map(Some)
    }

    /// Like [`request`](Self::request) but a `204 No Content` is a no-data failure
    pub(crate) async fn request_data(&self, request: &ApiRequest, strict: bool) -> Result<Value> {
        self.request(request, strict)
            .await?
            .ok_or_else(|| Error::NoData {
                endpoint: request.endpoint.clone(),
                response: String::new(),
            })
    }
}
