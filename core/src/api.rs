//! One-call-per-operation API over a `Transport`.

use tracing::debug;

use crate::client::TargetClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Target, TargetSpec};

/// Pairs a `TargetClient` with a `Transport`: build, execute, parse.
///
/// One outbound request per call. Nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct TargetApi<T> {
    client: TargetClient,
    transport: T,
}

impl<T: Transport> TargetApi<T> {
    pub fn new(client: TargetClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TargetClient {
        &self.client
    }

    pub fn create_target(&self, desired: &TargetSpec) -> Result<Target, ApiError> {
        let req = self.client.build_create_target(desired)?;
        let resp = self.transport.execute(req)?;
        let created = self.client.parse_create_target(resp)?;
        debug!(id = %created.id, "target created");
        Ok(created)
    }

    pub fn get_target(&self, id: &str) -> Result<Target, ApiError> {
        let req = self.client.build_get_target(id);
        let resp = self.transport.execute(req)?;
        self.client.parse_get_target(resp)
    }

    pub fn update_target(&self, id: &str, target: &Target) -> Result<Target, ApiError> {
        let req = self.client.build_update_target(id, target)?;
        let resp = self.transport.execute(req)?;
        self.client.parse_update_target(resp)
    }

    pub fn delete_target(&self, id: &str) -> Result<(), ApiError> {
        let req = self.client.build_delete_target(id);
        let resp = self.transport.execute(req)?;
        self.client.parse_delete_target(resp)
    }
}
