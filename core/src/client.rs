//! Configuration lookups against the Stilla API.
//!
//! # Design
//! `ConfigClient` holds only its validated `ClientConfig` and a transport; it
//! carries no mutable state between calls. A lookup is split into
//! `build_get_config` (key validation and request construction),
//! `Transport::execute` (the single network round-trip), and
//! `parse_get_config` (body decoding). Failures at any stage come back as a
//! `ConfigError` value, never as a panic.
//!
//! The response status is only consulted when the body is not JSON: a JSON
//! body is returned as data whatever the status, matching existing callers.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ConfigError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::ConfigResult;

/// Synchronous, stateless client for host configuration.
///
/// Safe to share across threads when the transport is; each call is an
/// independent GET with no retry.
#[derive(Debug, Clone)]
pub struct ConfigClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ConfigClient<UreqTransport> {
    /// Client over a default blocking `ureq` transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> ConfigClient<T> {
    /// Client over a caller-supplied transport (custom timeouts, test doubles).
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the configuration document stored under `key`.
    ///
    /// An empty `key` fails with `ConfigError::InvalidArgument` without
    /// touching the network.
    pub fn get_config(&self, key: &str) -> ConfigResult {
        let result = self
            .send_get_config(key)
            .and_then(|response| self.parse_get_config(response));

        if let Err(err) = &result {
            warn!(host_id = %self.config.host_id(), key, error = %err, "configuration request failed");
        }
        result
    }

    /// Issue the GET for `key` and return the raw response, status unchecked.
    pub fn send_get_config(&self, key: &str) -> Result<HttpResponse, ConfigError> {
        let request = self.build_get_config(key)?;
        debug!(
            host_id = %self.config.host_id(),
            key,
            method = request.method.as_str(),
            url = %request.url,
            "requesting configuration"
        );
        self.transport.execute(&request).map_err(ConfigError::from)
    }

    /// Fetch `key` and return the entry named `config_key` from it.
    ///
    /// A missing entry, or a document that is not a JSON object, yields
    /// `ConfigError::ValueNotFound`. Errors from the lookup itself are
    /// returned unchanged.
    pub fn get_config_value(&self, key: &str, config_key: &str) -> ConfigResult {
        let mut document = self.get_config(key)?;
        document
            .as_object_mut()
            .and_then(|entries| entries.remove(config_key))
            .ok_or(ConfigError::ValueNotFound)
    }

    /// Build the authenticated GET for `key`.
    pub fn build_get_config(&self, key: &str) -> Result<HttpRequest, ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::invalid_argument("the key must not be empty"));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.config.config_url(key)?,
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key()),
                ),
                ("HostID".to_string(), self.config.host_id().to_string()),
            ],
        })
    }

    /// Decode a response body into configuration data.
    pub fn parse_get_config(&self, response: HttpResponse) -> ConfigResult {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(data) => Ok(data),
            Err(_) if !response.is_success() => Err(ConfigError::NotFound),
            Err(e) => Err(ConfigError::Unknown(format!(
                "response body is not valid JSON: {e}"
            ))),
        }
    }
}
