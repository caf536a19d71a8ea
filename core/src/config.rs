//! Validated connection settings for the Stilla API.
//!
//! # Design
//! `ClientConfig` is checked once at construction and never mutated. An
//! invalid base URL or identifier is rejected here, so the request path can
//! assume well-formed inputs and only the config key is validated per call.

use std::fmt;

use url::Url;
use uuid::{Uuid, Version};

use crate::error::ConfigError;

/// Base URL used when none is supplied.
pub const DEFAULT_BASE_URL: &str = "https://stilla.com";

pub const ENV_BASE_URL: &str = "STILLA_BASE_URL";
pub const ENV_API_KEY: &str = "STILLA_API_KEY";
pub const ENV_HOST_ID: &str = "STILLA_HOST_ID";

/// Authentication details and API location for a single host.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    api_key: Uuid,
    host_id: Uuid,
}

impl ClientConfig {
    /// Validate `base_url` and both identifiers.
    ///
    /// `base_url` must be an absolute `http` or `https` URL with a host.
    /// `api_key` and `host_id` must be version-4 UUIDs.
    pub fn new(base_url: &str, api_key: Uuid, host_id: Uuid) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            api_key: validate_id("api_key", api_key)?,
            host_id: validate_id("host_id", host_id)?,
        })
    }

    /// Like `new`, pointing at `DEFAULT_BASE_URL`.
    pub fn with_default_url(api_key: Uuid, host_id: Uuid) -> Result<Self, ConfigError> {
        Self::new(DEFAULT_BASE_URL, api_key, host_id)
    }

    /// Build from string identifiers, as read from flags or config files.
    pub fn parse(base_url: &str, api_key: &str, host_id: &str) -> Result<Self, ConfigError> {
        Self::new(
            base_url,
            parse_id("api_key", api_key)?,
            parse_id("host_id", host_id)?,
        )
    }

    /// Read `STILLA_BASE_URL`, `STILLA_API_KEY` and `STILLA_HOST_ID`.
    ///
    /// The base URL falls back to `DEFAULT_BASE_URL`; both identifiers are
    /// required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::invalid_argument(format!("{name} is not set")))
        };
        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::parse(&base_url, &required(ENV_API_KEY)?, &required(ENV_HOST_ID)?)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn api_key(&self) -> Uuid {
        self.api_key
    }

    pub fn host_id(&self) -> Uuid {
        self.host_id
    }

    /// `{base_url}/api/v1/host/{host_id}/config/{key}` with `key` encoded as
    /// a single path segment.
    pub(crate) fn config_url(&self, key: &str) -> Result<String, ConfigError> {
        // Dot segments are dropped by URL normalization and would hit the parent route.
        if key == "." || key == ".." {
            return Err(ConfigError::invalid_argument(format!(
                "the key must not be {key:?}"
            )));
        }
        let mut url = self.base_url.clone();
        let host_id = self.host_id.to_string();
        url.path_segments_mut()
            .map_err(|()| ConfigError::invalid_argument("base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(["api", "v1", "host", host_id.as_str(), "config", key]);
        Ok(url.into())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url())
            .field("api_key", &"<redacted>")
            .field("host_id", &self.host_id)
            .finish()
    }
}

fn validate_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::invalid_argument(format!("base_url must be a valid url: {raw:?}"));
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid());
    }
    Ok(url)
}

fn validate_id(field: &str, id: Uuid) -> Result<Uuid, ConfigError> {
    if id.get_version() != Some(Version::Random) {
        return Err(ConfigError::invalid_argument(format!(
            "{field} must be a version 4 UUID"
        )));
    }
    Ok(id)
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, ConfigError> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| ConfigError::invalid_argument(format!("{field} is not a valid UUID: {e}")))
}
