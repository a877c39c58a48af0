//! `tontrace.toml` loading and settings resolution.
//!
//! Every value is resolved with the same precedence: explicit override
//! (a CLI flag), then environment, then the config file, then the built-in
//! default. Only the API key has an environment source.

use crate::client::ClientConfig;
use crate::network::Network;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tontrace_kernel::StateInitPolicy;
use tracing::debug;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "tontrace.toml";
pub const API_KEY_ENV: &str = "TONCENTER_API_KEY";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_WATCH_INTERVAL_MS: u64 = 3_000;
const DEFAULT_WATCH_MAX_POLLS: u32 = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown network `{0}` (expected mainnet or testnet)")]
    UnknownNetwork(String),

    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("{0}")]
    Invalid(String),
}

/// The on-disk shape. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub network: NetworkSection,
    pub normalization: NormalizationSection,
    pub watch: WatchSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSection {
    pub name: Option<String>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationSection {
    pub state_init: Option<StateInitPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSection {
    pub interval_ms: Option<u64>,
    pub max_polls: Option<u32>,
}

impl ConfigFile {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::ParseToml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// An explicit path must exist. Without one, `tontrace.toml` in the
    /// working directory is used when present and defaults otherwise.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(path = %fallback.display(), "using config file");
            return Self::load(&fallback);
        }
        Ok(Self::default())
    }
}

/// Values supplied on the command line; `None` defers to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub network: Option<Network>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_ms: Option<u64>,
    pub state_init: Option<StateInitPolicy>,
    pub interval_ms: Option<u64>,
    pub max_polls: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    pub interval: Duration,
    pub max_polls: u32,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub network: Network,
    pub client: ClientConfig,
    pub state_init: StateInitPolicy,
    pub watch: WatchSettings,
}

impl Settings {
    /// Resolve using the process environment for the API key.
    pub fn from_env(file: &ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let env_api_key = std::env::var(API_KEY_ENV).ok();
        Self::resolve(file, overrides, env_api_key)
    }

    pub fn resolve(
        file: &ConfigFile,
        overrides: &Overrides,
        env_api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let network = match (overrides.network, file.network.name.as_deref()) {
            (Some(network), _) => network,
            (None, Some(name)) => name.parse()?,
            (None, None) => Network::default(),
        };

        let endpoint = overrides
            .endpoint
            .as_deref()
            .or(file.network.endpoint.as_deref())
            .unwrap_or(network.default_endpoint());
        let endpoint = parse_endpoint(endpoint)?;

        let api_key = overrides
            .api_key
            .clone()
            .or(env_api_key)
            .or_else(|| file.network.api_key.clone())
            .filter(|key| !key.trim().is_empty());

        let timeout_ms = overrides
            .timeout_ms
            .or(file.network.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let interval_ms = overrides
            .interval_ms
            .or(file.watch.interval_ms)
            .unwrap_or(DEFAULT_WATCH_INTERVAL_MS);
        let max_polls = overrides
            .max_polls
            .or(file.watch.max_polls)
            .unwrap_or(DEFAULT_WATCH_MAX_POLLS);

        if timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".into()));
        }
        if max_polls == 0 {
            return Err(ConfigError::Invalid("max_polls must be positive".into()));
        }

        Ok(Self {
            network,
            client: ClientConfig {
                endpoint,
                api_key,
                timeout: Duration::from_millis(timeout_ms),
            },
            state_init: overrides
                .state_init
                .or(file.normalization.state_init)
                .unwrap_or_default(),
            watch: WatchSettings {
                interval: Duration::from_millis(interval_ms),
                max_polls,
            },
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}
