//! Domain types for the target API.
//!
//! # Design
//! Field names on the wire are fixed by the remote service (`ID`,
//! `Endpoint`, `Tags`). `TargetSpec` is the caller's desired state and has
//! no `id` field at all, so a create request cannot carry one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::drift::TargetDrift;
use crate::error::ControllerError;

/// Tag key/value pairs. Ordering is irrelevant to the service; a sorted map
/// keeps equality and serialized output stable.
pub type Tags = BTreeMap<String, String>;

/// A target as known to the remote service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Tags")]
    pub tags: Tags,
}

impl Target {
    /// The desired-state view of this target.
    pub fn spec(&self) -> TargetSpec {
        TargetSpec {
            endpoint: self.endpoint.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Desired state for a target, as declared by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetSpec {
    #[serde(rename = "Endpoint")]
    pub endpoint: String,
    #[serde(rename = "Tags")]
    pub tags: Tags,
}

impl TargetSpec {
    pub fn new(endpoint: impl Into<String>, tags: Tags) -> Self {
        Self {
            endpoint: endpoint.into(),
            tags,
        }
    }

    /// Required-field presence check. `tags` may be empty.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.endpoint.trim().is_empty() {
            return Err(ControllerError::InvalidSpec("endpoint must not be empty"));
        }
        Ok(())
    }

    pub(crate) fn with_id(&self, id: &str) -> Target {
        Target {
            id: id.to_string(),
            endpoint: self.endpoint.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Lifecycle state of one managed target, persisted by the caller between
/// invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetState {
    /// Never created, or deleted.
    #[default]
    Absent,
    /// Created on the remote service and not yet deleted.
    Present(Target),
}

impl TargetState {
    pub fn is_present(&self) -> bool {
        matches!(self, TargetState::Present(_))
    }

    pub fn target(&self) -> Option<&Target> {
        match self {
            TargetState::Present(target) => Some(target),
            TargetState::Absent => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.target().map(|t| t.id.as_str())
    }

    /// Differences between `desired` and the last known remote state.
    ///
    /// Returns `None` when the target is absent, since nothing exists to
    /// drift from.
    pub fn drift_from(&self, desired: &TargetSpec) -> Option<TargetDrift> {
        self.target().map(|t| TargetDrift::between(desired, t))
    }
}
