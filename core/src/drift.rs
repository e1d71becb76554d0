//! Drift between a desired target and the state last read from the service.

use std::fmt;

use crate::types::{Target, TargetSpec};

/// A tag whose value differs between desired and remote state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChange {
    pub key: String,
    pub desired: String,
    pub actual: String,
}

/// Everything that would change if the remote target were brought in line
/// with the desired spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDrift {
    /// `(desired, actual)` when the endpoints differ.
    pub endpoint: Option<(String, String)>,
    /// Desired tags missing on the remote target.
    pub tags_added: Vec<(String, String)>,
    /// Remote tags not present in the desired spec.
    pub tags_removed: Vec<(String, String)>,
    pub tags_changed: Vec<TagChange>,
}

impl TargetDrift {
    pub fn between(desired: &TargetSpec, actual: &Target) -> Self {
        let endpoint = (desired.endpoint != actual.endpoint)
            .then(|| (desired.endpoint.clone(), actual.endpoint.clone()));

        let mut drift = TargetDrift {
            endpoint,
            ..Default::default()
        };

        for (key, want) in &desired.tags {
            match actual.tags.get(key) {
                None => drift.tags_added.push((key.clone(), want.clone())),
                Some(have) if have != want => drift.tags_changed.push(TagChange {
                    key: key.clone(),
                    desired: want.clone(),
                    actual: have.clone(),
                }),
                Some(_) => {}
            }
        }
        for (key, have) in &actual.tags {
            if !desired.tags.contains_key(key) {
                drift.tags_removed.push((key.clone(), have.clone()));
            }
        }

        drift
    }

    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.tags_added.is_empty()
            && self.tags_removed.is_empty()
            && self.tags_changed.is_empty()
    }
}

impl fmt::Display for TargetDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("no changes");
        }
        let mut parts = Vec::new();
        if let Some((desired, actual)) = &self.endpoint {
            parts.push(format!("endpoint {actual:?} -> {desired:?}"));
        }
        for (k, v) in &self.tags_added {
            parts.push(format!("+tag {k}={v:?}"));
        }
        for (k, v) in &self.tags_removed {
            parts.push(format!("-tag {k}={v:?}"));
        }
        for c in &self.tags_changed {
            parts.push(format!("~tag {}={:?} -> {:?}", c.key, c.actual, c.desired));
        }
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tags;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn remote(endpoint: &str, t: Tags) -> Target {
        Target {
            id: "abc-123".to_string(),
            endpoint: endpoint.to_string(),
            tags: t,
        }
    }

    #[test]
    fn identical_state_has_no_drift() {
        let desired = TargetSpec::new("10.0.0.1:443", tags(&[("env", "prod")]));
        let drift = TargetDrift::between(&desired, &remote("10.0.0.1:443", tags(&[("env", "prod")])));
        assert!(drift.is_empty());
        assert_eq!(drift.to_string(), "no changes");
    }

    #[test]
    fn reports_endpoint_and_tag_differences() {
        let desired = TargetSpec::new(
            "10.0.0.2:443",
            tags(&[("env", "prod"), ("team", "net")]),
        );
        let actual = remote("10.0.0.1:443", tags(&[("env", "dev"), ("owner", "ops")]));
        let drift = TargetDrift::between(&desired, &actual);

        assert_eq!(
            drift.endpoint,
            Some(("10.0.0.2:443".to_string(), "10.0.0.1:443".to_string()))
        );
        assert_eq!(drift.tags_added, vec![("team".to_string(), "net".to_string())]);
        assert_eq!(drift.tags_removed, vec![("owner".to_string(), "ops".to_string())]);
        assert_eq!(
            drift.tags_changed,
            vec![TagChange {
                key: "env".to_string(),
                desired: "prod".to_string(),
                actual: "dev".to_string(),
            }]
        );
        assert!(!drift.is_empty());
    }

    #[test]
    fn clearing_all_tags_is_drift() {
        let desired = TargetSpec::new("10.0.0.1:443", Tags::new());
        let drift = TargetDrift::between(&desired, &remote("10.0.0.1:443", tags(&[("env", "prod")])));
        assert_eq!(drift.tags_removed.len(), 1);
        assert_eq!(drift.to_string(), r#"-tag env="prod""#);
    }
}
