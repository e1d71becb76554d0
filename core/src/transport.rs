//! Executes `HttpRequest`s against the network.
//!
//! `Transport` is the seam between the sans-IO client and real I/O. The
//! default implementation is blocking and backed by [`ureq`]; tests plug in
//! scripted transports instead.

use std::io::Read as _;
use std::time::Duration;

use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must return non-2xx responses as data, not errors;
/// status interpretation belongs to `TargetClient::parse_*`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// A [`Transport`] backed by a blocking [`ureq::Agent`].
///
/// Every request is bounded by the configured timeout, so a hung server
/// surfaces as a `TransportError` instead of blocking the caller forever.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are interpreted by the client, not the agent.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.timeout)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");

        let HttpRequest {
            method,
            path,
            headers,
            body,
        } = request;

        let result = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&path), &headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&path), &headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&path), &headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&path), &headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&path), &headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&path), &headers).send_empty(),
        };

        let response = result.map_err(|e| self.map_ureq_error(e))?;
        let (parts, body) = response.into_parts();
        let status = parts.status.as_u16();
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Read raw bytes so a non-UTF-8 body still reaches status handling.
        let mut bytes = Vec::new();
        body.into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::TransportError(format!("failed to read response body: {e}")))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl UreqTransport {
    fn map_ureq_error(&self, err: ureq::Error) -> ApiError {
        match err {
            ureq::Error::Timeout(_) => {
                ApiError::TransportError(format!("request timed out after {:?}", self.timeout))
            }
            ureq::Error::HostNotFound => ApiError::TransportError("host not found".to_owned()),
            ureq::Error::Io(e) => ApiError::TransportError(e.to_string()),
            e => ApiError::TransportError(e.to_string()),
        }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
