//! Stateless HTTP request builder and response parser for the target API.
//!
//! # Design
//! `TargetClient` holds the base URL and credentials and carries no mutable
//! state between calls, so one instance can serve any number of managed
//! targets concurrently. Each CRUD operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. A `Transport` runs the round-trip in between.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;
use urlencoding::encode;

use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Target, TargetSpec};

/// Exact body the service returns once a target has been deleted.
pub const DELETE_CONFIRMATION: &str = r#"{"message":"Target deleted successfully"}"#;

/// Synchronous, stateless client for the target API.
#[derive(Debug, Clone)]
pub struct TargetClient {
    base_url: String,
    username: String,
    password: SecretString,
}

impl TargetClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.host.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_create_target(&self, desired: &TargetSpec) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(desired)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, format!("{}/targets", self.base_url), Some(body)))
    }

    pub fn build_get_target(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, format!("{}/target/{}", self.base_url, encode(id)), None)
    }

    pub fn build_update_target(&self, id: &str, target: &Target) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(target)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, format!("{}/targets/{}", self.base_url, encode(id)), Some(body)))
    }

    pub fn build_delete_target(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("{}/targets/{}", self.base_url, encode(id)), None)
    }

    /// The server mints the ID; a response without one is malformed.
    pub fn parse_create_target(&self, response: HttpResponse) -> Result<Target, ApiError> {
        let target: Target = parse_json(response)?;
        if target.id.is_empty() {
            return Err(ApiError::DeserializationError(
                "created target has an empty ID".to_string(),
            ));
        }
        Ok(target)
    }

    pub fn parse_get_target(&self, response: HttpResponse) -> Result<Target, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_target(&self, response: HttpResponse) -> Result<Target, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_target(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        if response.body != DELETE_CONFIRMATION {
            return Err(ApiError::DeleteNotConfirmed(response.body));
        }
        Ok(())
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), self.basic_auth())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path,
            headers,
            body,
        }
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password.expose_secret());
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

/// Anything but 200 is a protocol error carrying the status and raw body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
