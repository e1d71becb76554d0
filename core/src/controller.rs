//! Lifecycle controller for a single managed target.
//!
//! # Design
//! The caller owns a `TargetState` per managed target and persists it
//! between invocations. Every controller method takes that state by `&mut`
//! and only writes it after the remote call succeeded, so a failed call
//! leaves the previous state untouched. The one exception is a read that
//! finds the target gone (404), which drops it to `Absent`.
//!
//! The controller itself is immutable and can be shared between many
//! managed targets.

use tracing::{info, warn};

use crate::api::TargetApi;
use crate::drift::TargetDrift;
use crate::error::ControllerError;
use crate::transport::Transport;
use crate::types::{TargetSpec, TargetState};

/// What `reconcile` had to do to bring the remote target in line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated(TargetDrift),
    Unchanged,
}

/// Drives create/read/update/delete against the target service.
#[derive(Debug, Clone)]
pub struct TargetController<T> {
    api: TargetApi<T>,
}

impl<T: Transport> TargetController<T> {
    pub fn new(api: TargetApi<T>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &TargetApi<T> {
        &self.api
    }

    /// Absent → Present. Only the server-assigned ID is taken from the
    /// response; endpoint and tags come from `desired`.
    pub fn create(&self, state: &mut TargetState, desired: &TargetSpec) -> Result<(), ControllerError> {
        desired.validate()?;
        if let Some(id) = state.id() {
            return Err(ControllerError::InvalidState {
                operation: "create",
                reason: format!("target {id} already exists"),
            });
        }

        let created = self
            .api
            .create_target(desired)
            .map_err(ControllerError::Create)?;

        info!(id = %created.id, endpoint = %desired.endpoint, "target created");
        *state = TargetState::Present(desired.with_id(&created.id));
        Ok(())
    }

    /// Refresh endpoint and tags from the server. The ID is never changed.
    ///
    /// A 404 means the target was removed out-of-band; the state becomes
    /// `Absent` and the call succeeds. Reading an absent target is a no-op.
    pub fn read(&self, state: &mut TargetState) -> Result<(), ControllerError> {
        let TargetState::Present(current) = state else {
            return Ok(());
        };

        match self.api.get_target(&current.id) {
            Ok(remote) => {
                current.endpoint = remote.endpoint;
                current.tags = remote.tags;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(id = %current.id, "target no longer exists remotely, dropping from state");
                *state = TargetState::Absent;
                Ok(())
            }
            Err(e) => Err(ControllerError::Read(e)),
        }
    }

    /// Push `desired` to an existing target, keeping its ID.
    ///
    /// On success the state adopts `desired` as-is; the response body is
    /// only compared against it.
    pub fn update(&self, state: &mut TargetState, desired: &TargetSpec) -> Result<(), ControllerError> {
        desired.validate()?;
        let TargetState::Present(current) = state else {
            return Err(ControllerError::InvalidState {
                operation: "update",
                reason: "target has not been created".to_string(),
            });
        };

        let next = desired.with_id(&current.id);
        let returned = self
            .api
            .update_target(&current.id, &next)
            .map_err(ControllerError::Update)?;

        if returned.endpoint != next.endpoint || returned.tags != next.tags {
            let drift = TargetDrift::between(desired, &returned);
            warn!(id = %next.id, %drift, "update response differs from requested state");
        }

        info!(id = %next.id, endpoint = %next.endpoint, "target updated");
        *current = next;
        Ok(())
    }

    /// Present → Absent. Deleting an absent target is a no-op.
    pub fn delete(&self, state: &mut TargetState) -> Result<(), ControllerError> {
        let Some(id) = state.id() else {
            return Ok(());
        };

        self.api.delete_target(id).map_err(ControllerError::Delete)?;

        info!(id = %id, "target deleted");
        *state = TargetState::Absent;
        Ok(())
    }

    /// Bring the remote target in line with `desired`: create it when
    /// absent (or found missing on refresh), update it when it drifted.
    pub fn reconcile(
        &self,
        state: &mut TargetState,
        desired: &TargetSpec,
    ) -> Result<ReconcileOutcome, ControllerError> {
        desired.validate()?;
        self.read(state)?;

        match state.drift_from(desired) {
            None => {
                self.create(state, desired)?;
                Ok(ReconcileOutcome::Created)
            }
            Some(drift) if drift.is_empty() => Ok(ReconcileOutcome::Unchanged),
            Some(drift) => {
                info!(id = ?state.id(), %drift, "drift detected");
                self.update(state, desired)?;
                Ok(ReconcileOutcome::Updated(drift))
            }
        }
    }
}
