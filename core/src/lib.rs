//! Lifecycle core for netprobes targets.
//!
//! # Overview
//! Reconciles a locally declared target (endpoint + tags) against the
//! netprobes HTTP service. The caller supplies desired state and persists
//! the resulting `TargetState` between invocations.
//!
//! # Design
//! - `TargetClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - A `Transport` executes the round-trip; `UreqTransport` is the blocking
//!   default, bounded by the configured timeout.
//! - `TargetApi` chains build, execute and parse into one call per operation.
//! - `TargetController` owns the Absent/Present state machine and wraps API
//!   failures with the operation that failed.
//! - `ProviderConfig` is resolved and validated once, up front.

pub mod api;
pub mod client;
pub mod config;
pub mod controller;
pub mod drift;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::TargetApi;
pub use client::{TargetClient, DELETE_CONFIRMATION};
pub use config::{ConfigOverrides, ProviderConfig};
pub use controller::{ReconcileOutcome, TargetController};
pub use drift::{TagChange, TargetDrift};
pub use error::{ApiError, ConfigError, ControllerError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Tags, Target, TargetSpec, TargetState};

/// Build a controller wired to the blocking HTTP transport.
pub fn connect(config: &ProviderConfig) -> TargetController<UreqTransport> {
    let api = TargetApi::new(TargetClient::new(config), UreqTransport::from_config(config));
    TargetController::new(api)
}
