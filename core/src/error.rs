//! Error types for the target API client and lifecycle controller.
//!
//! # Design
//! Every non-200 response lands in `ApiError::HttpError` with the raw status
//! code and body, including 404. Callers that care about "the target no
//! longer exists" ask `is_not_found()` instead of matching a separate
//! variant.

use thiserror::Error;

/// Errors produced while building, sending or parsing a target API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: connection refused, DNS
    /// failure, timeout or a broken body stream.
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server answered with a status other than 200.
    #[error("status: {status}, body: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into a target.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// DELETE returned 200 with something other than the confirmation body.
    #[error("{0}")]
    DeleteNotConfirmed(String),
}

impl ApiError {
    /// True when the server reported that the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::HttpError { status: 404, .. })
    }
}

/// Errors surfaced by `TargetController`.
///
/// API failures are wrapped with the name of the operation that failed so
/// the caller sees e.g. `Failed to create target: status: 500, body: ...`.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Failed to create target: {0}")]
    Create(#[source] ApiError),

    #[error("Failed to read target: {0}")]
    Read(#[source] ApiError),

    #[error("Failed to update target: {0}")]
    Update(#[source] ApiError),

    #[error("Failed to delete target: {0}")]
    Delete(#[source] ApiError),

    /// The desired state is missing a required field.
    #[error("invalid target: {0}")]
    InvalidSpec(&'static str),

    /// The operation is not valid for the current lifecycle state.
    #[error("cannot {operation} target: {reason}")]
    InvalidState {
        operation: &'static str,
        reason: String,
    },
}

impl ControllerError {
    /// The underlying API error, if this failure came from the remote call.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ControllerError::Create(e)
            | ControllerError::Read(e)
            | ControllerError::Update(e)
            | ControllerError::Delete(e) => Some(e),
            ControllerError::InvalidSpec(_) | ControllerError::InvalidState { .. } => None,
        }
    }
}

/// Errors raised while resolving `ProviderConfig`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration value `{0}`; set it explicitly or via {1}")]
    Missing(&'static str, &'static str),

    #[error("invalid timeout `{0}`: expected a positive whole number of seconds")]
    InvalidTimeout(String),
}
