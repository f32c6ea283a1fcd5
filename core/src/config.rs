//! Client configuration.
//!
//! There are no config files. The base URL defaults to the production
//! backend and can be pointed elsewhere through `ANIMAL_SPOTTER_API_URL`.

use url::Url;

use crate::client::DEFAULT_BASE_URL;
use crate::error::ConfigError;

pub const BASE_URL_ENV: &str = "ANIMAL_SPOTTER_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
}

impl ClientConfig {
    /// Parse `base_url`. URLs that cannot take path segments (`mailto:`,
    /// `data:` and the like) are rejected here rather than when a client is
    /// built from the config.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: "url cannot carry path segments".to_string(),
            });
        }
        Ok(Self { base_url: parsed })
    }

    /// Read `ANIMAL_SPOTTER_API_URL`, falling back to the production
    /// backend when it is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::new(DEFAULT_BASE_URL),
        }
    }
}
