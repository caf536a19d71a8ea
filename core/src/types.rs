//! Result shapes returned to callers.
//!
//! `ConfigResult` is what the client returns. `ConfigEnvelope` renders the
//! same outcome in the `{"data": ...}` / `{"error": "..."}` mapping shape for
//! callers that forward results as JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Outcome of a configuration lookup.
pub type ConfigResult<T = Value> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigEnvelope {
    Data(Value),
    Error(String),
}

impl ConfigEnvelope {
    pub fn is_error(&self) -> bool {
        matches!(self, ConfigEnvelope::Error(_))
    }
}

impl From<ConfigResult> for ConfigEnvelope {
    fn from(result: ConfigResult) -> Self {
        match result {
            Ok(data) => ConfigEnvelope::Data(data),
            Err(err) => ConfigEnvelope::Error(err.to_string()),
        }
    }
}
