//! Effective settings resolution.
//!
//! Merges command-line flags, environment variables and the config file into
//! the settings used for one invocation. Precedence, per field:
//!
//! 1. command-line flag
//! 2. environment variable
//! 3. config file (the `--server`/`UNRAID_SERVER` profile, else the default)
//!
//! The timeout has no config-file layer and falls back to
//! [`DEFAULT_TIMEOUT_SECS`].

use std::time::Duration;

use crate::config::ConfigFile;
use crate::error::{Error, Result};

pub const ENV_URL: &str = "UNRAID_URL";
pub const ENV_API_KEY: &str = "UNRAID_API_KEY";
pub const ENV_SERVER: &str = "UNRAID_SERVER";
pub const ENV_TIMEOUT: &str = "UNRAID_TIMEOUT";

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Values given as command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Raw `--timeout` value, validated during resolution
    pub timeout: Option<String>,
}

/// Values read from `UNRAID_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub server: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<String>,
}

impl EnvOverrides {
    /// Snapshot the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            server: get(ENV_SERVER),
            url: get(ENV_URL),
            api_key: get(ENV_API_KEY),
            timeout: get(ENV_TIMEOUT),
        }
    }
}

/// Settings used for one command invocation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    pub url: String,
    pub api_key: String,
    /// Profile the settings were drawn from, if any
    pub server_name: Option<String>,
    pub timeout: Duration,
}

/// Resolve effective settings from the three sources.
pub fn resolve(
    cli: &CliOverrides,
    env: &EnvOverrides,
    config: &ConfigFile,
) -> Result<EffectiveSettings> {
    let timeout = resolve_timeout(cli, env)?;

    let profile = match cli.server.as_deref().or(env.server.as_deref()) {
        Some(name) => {
            let entry = config
                .get(name)
                .ok_or_else(|| Error::UnknownServer(name.to_string()))?;
            Some((name, entry))
        }
        None => {
            if let Some(name) = config.dangling_default() {
                tracing::warn!(default = name, "Ignoring default server that is not configured");
            }
            config.default_server()
        }
    };

    let url = cli
        .url
        .clone()
        .or_else(|| env.url.clone())
        .or_else(|| profile.map(|(_, entry)| entry.url.clone()));
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env.api_key.clone())
        .or_else(|| profile.map(|(_, entry)| entry.api_key.clone()));

    let (url, api_key) = match (url, api_key) {
        (Some(url), Some(api_key)) => (url, api_key),
        (url, api_key) => {
            let missing = [
                url.is_none().then_some("server URL"),
                api_key.is_none().then_some("API key"),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" and ");
            return Err(Error::MissingCredentials { missing });
        }
    };

    let server_name = profile.map(|(name, _)| name.to_string());
    tracing::debug!(server = ?server_name, url = %url, timeout_secs = timeout.as_secs(), "Resolved settings");

    Ok(EffectiveSettings {
        url,
        api_key,
        server_name,
        timeout,
    })
}

fn resolve_timeout(cli: &CliOverrides, env: &EnvOverrides) -> Result<Duration> {
    let (raw, origin) = match (&cli.timeout, &env.timeout) {
        (Some(raw), _) => (raw, "--timeout"),
        (None, Some(raw)) => (raw, ENV_TIMEOUT),
        (None, None) => return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    };

    parse_timeout(raw)
        .map(Duration::from_secs)
        .ok_or_else(|| Error::InvalidTimeout {
            value: raw.clone(),
            origin: origin.to_string(),
        })
}

/// Positive whole number of seconds.
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout_accepts_positive_integers() {
        assert_eq!(parse_timeout("5"), Some(5));
        assert_eq!(parse_timeout(" 30 "), Some(30));
    }

    #[test]
    fn parse_timeout_rejects_everything_else() {
        for raw in ["", "0", "-1", "abc", "1.5", "5s", "18446744073709551616"] {
            assert_eq!(parse_timeout(raw), None, "accepted {raw:?}");
        }
    }

    #[test]
    fn env_lookup_treats_empty_values_as_unset() {
        let env = EnvOverrides::from_lookup(|key| match key {
            ENV_URL => Some(String::new()),
            ENV_API_KEY => Some("key".to_string()),
            _ => None,
        });

        assert_eq!(env.url, None);
        assert_eq!(env.api_key.as_deref(), Some("key"));
        assert_eq!(env.server, None);
        assert_eq!(env.timeout, None);
    }

    #[test]
    fn missing_credentials_names_both_fields() {
        let err = resolve(
            &CliOverrides::default(),
            &EnvOverrides::default(),
            &ConfigFile::new(),
        )
        .unwrap_err();

        match err {
            Error::MissingCredentials { missing } => {
                assert_eq!(missing, "server URL and API key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
