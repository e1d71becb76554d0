//! Provider configuration: where the target service lives and how to
//! authenticate against it.
//!
//! Values can be given explicitly (`ConfigOverrides`) or come from the
//! environment. Explicit values always win. Resolution fails fast when any
//! of host, username or password ends up empty.

use std::time::Duration;

use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::ConfigError;

pub const HOSTNAME_ENV: &str = "NETPROBES_HOSTNAME";
pub const USERNAME_ENV: &str = "NETPROBES_USERNAME";
pub const PASSWORD_ENV: &str = "NETPROBES_PASSWORD";
pub const TIMEOUT_ENV: &str = "NETPROBES_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Explicitly configured values. Any field left as `None` falls back to its
/// environment variable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigOverrides {
    #[serde(alias = "hostname")]
    pub host: Option<String>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    pub timeout_secs: Option<u64>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Validated configuration, constructed once and handed to the client and
/// transport.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Build a configuration from explicit values, validating them.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let overrides = ConfigOverrides {
            host: Some(host.into()),
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
            timeout_secs: None,
        };
        Self::resolve(overrides, |_| None)
    }

    /// Resolve against the process environment.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve explicit values, falling back to `lookup` for anything unset.
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = overrides
            .host
            .or_else(|| lookup(HOSTNAME_ENV))
            .unwrap_or_default();
        let username = overrides
            .username
            .or_else(|| lookup(USERNAME_ENV))
            .unwrap_or_default();
        let password = overrides
            .password
            .or_else(|| lookup(PASSWORD_ENV).map(SecretString::from))
            .unwrap_or_else(|| SecretString::from(String::new()));

        let timeout = match overrides.timeout_secs {
            Some(0) => return Err(ConfigError::InvalidTimeout("0".to_string())),
            Some(secs) => Duration::from_secs(secs),
            None => match lookup(TIMEOUT_ENV) {
                Some(raw) => {
                    let parsed = raw.trim().parse::<u64>();
                    match parsed {
                        Ok(secs) if secs > 0 => Duration::from_secs(secs),
                        _ => return Err(ConfigError::InvalidTimeout(raw)),
                    }
                }
                None => DEFAULT_TIMEOUT,
            },
        };

        if is_blank(&host) {
            return Err(ConfigError::Missing("host", HOSTNAME_ENV));
        }
        if is_blank(&username) {
            return Err(ConfigError::Missing("username", USERNAME_ENV));
        }
        if is_blank(password.expose_secret()) {
            return Err(ConfigError::Missing("password", PASSWORD_ENV));
        }

        debug!(host = %host, username = %username, ?timeout, "resolved provider configuration");

        Ok(Self {
            host,
            username,
            password,
            timeout,
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret as _;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn explicit_values_need_no_environment() {
        let config = ProviderConfig::new("http://localhost:3000", "admin", "hunter2").unwrap();
        assert_eq!(config.host, "http://localhost:3000");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password.expose_secret(), "hunter2");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn falls_back_to_environment() {
        let config = ProviderConfig::resolve(
            ConfigOverrides::default(),
            env(&[
                (HOSTNAME_ENV, "http://probes:8080"),
                (USERNAME_ENV, "svc"),
                (PASSWORD_ENV, "s3cret"),
                (TIMEOUT_ENV, "5"),
            ]),
        )
        .unwrap();
        assert_eq!(config.host, "http://probes:8080");
        assert_eq!(config.username, "svc");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn explicit_values_override_environment() {
        let overrides = ConfigOverrides {
            username: Some("explicit".to_string()),
            ..Default::default()
        };
        let config = ProviderConfig::resolve(
            overrides,
            env(&[
                (HOSTNAME_ENV, "http://probes:8080"),
                (USERNAME_ENV, "from-env"),
                (PASSWORD_ENV, "s3cret"),
            ]),
        )
        .unwrap();
        assert_eq!(config.username, "explicit");
    }

    #[test]
    fn empty_values_are_rejected() {
        let err = ProviderConfig::new("", "admin", "pw").unwrap_err();
        assert_eq!(err, ConfigError::Missing("host", HOSTNAME_ENV));

        let err = ProviderConfig::new("http://h", "", "pw").unwrap_err();
        assert_eq!(err, ConfigError::Missing("username", USERNAME_ENV));

        let err = ProviderConfig::new("http://h", "admin", "").unwrap_err();
        assert_eq!(err, ConfigError::Missing("password", PASSWORD_ENV));
    }

    #[test]
    fn whitespace_only_values_are_rejected() {
        let err = ProviderConfig::new("http://h", "  ", "pw").unwrap_err();
        assert_eq!(err, ConfigError::Missing("username", USERNAME_ENV));

        let err = ProviderConfig::new("http://h", "admin", "\t").unwrap_err();
        assert_eq!(err, ConfigError::Missing("password", PASSWORD_ENV));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ProviderConfig::resolve(
            ConfigOverrides::default(),
            env(&[
                (HOSTNAME_ENV, "http://h"),
                (USERNAME_ENV, "u"),
                (PASSWORD_ENV, "p"),
                (TIMEOUT_ENV, "0"),
            ]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));

        let overrides = ConfigOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let err = ProviderConfig::resolve(
            overrides,
            env(&[(HOSTNAME_ENV, "http://h"), (USERNAME_ENV, "u"), (PASSWORD_ENV, "p")]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("0".to_string()));
    }

    #[test]
    fn unparsable_timeout_is_rejected() {
        let err = ProviderConfig::resolve(
            ConfigOverrides::default(),
            env(&[
                (HOSTNAME_ENV, "http://h"),
                (USERNAME_ENV, "u"),
                (PASSWORD_ENV, "p"),
                (TIMEOUT_ENV, "soon"),
            ]),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }

    #[test]
    fn overrides_deserialize_and_redact_password() {
        let overrides: ConfigOverrides = serde_json::from_str(
            r#"{"hostname":"http://h","username":"u","password":"p","timeout-secs":3}"#,
        )
        .unwrap();
        assert_eq!(overrides.host.as_deref(), Some("http://h"));
        assert_eq!(overrides.timeout_secs, Some(3));

        let config = ProviderConfig::resolve(overrides, |_| None).unwrap();
        assert!(!format!("{config:?}").contains("\"p\""));
    }
}
