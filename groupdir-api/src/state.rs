//! App state: group lookup service and config.

use std::path::PathBuf;

use groupdir_core::constants::API_KEY_ENV;
use groupdir_core::error::{GroupError, Result};
use groupdir_lookup::{GroupLookup, LookupConfig};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// W3C API key
    pub api_key: String,
    /// W3C API base URL override
    pub api_url: Option<String>,
    /// Group table override
    pub groups_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Creates a config for the public W3C API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: None,
            groups_file: None,
        }
    }

    /// Reads the config from the environment (and `.env` if present).
    ///
    /// `W3C_API_KEY` is required; `W3C_API_URL` and `GROUPS_FILE` are optional.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GroupError::Config(format!("{} is not set", API_KEY_ENV)))?;

        Ok(Self {
            api_key,
            api_url: std::env::var("W3C_API_URL").ok(),
            groups_file: std::env::var("GROUPS_FILE").ok().map(PathBuf::from),
        })
    }

    /// Lookup configuration derived from this config.
    pub fn lookup_config(&self) -> LookupConfig {
        let mut config = LookupConfig::new(&self.api_key);
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url);
        }
        if let Some(path) = &self.groups_file {
            config = config.with_groups_file(path);
        }
        config
    }
}

/// Shared state of the HTTP handlers.
pub struct AppState {
    /// Group lookup service
    pub lookup: GroupLookup,
}

impl AppState {
    /// Builds the lookup service described by `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self::with_lookup(GroupLookup::with_config(config.lookup_config())?))
    }

    /// Wraps an existing lookup service.
    pub fn with_lookup(lookup: GroupLookup) -> Self {
        Self { lookup }
    }
}
