//! Client SDK for the Stilla configuration service.
//!
//! # Overview
//! Retrieves host-scoped configuration documents over HTTP. A
//! `ClientConfig` carries the validated base URL, API key and host ID; a
//! `ConfigClient` turns a config key into one authenticated GET and returns
//! the decoded JSON body or a `ConfigError`.
//!
//! # Example
//! ```no_run
//! use stilla_client::{ClientConfig, ConfigClient, ConfigEnvelope};
//!
//! let config = ClientConfig::parse(
//!     "https://stilla.com",
//!     "d6845fe3-7054-4323-8ce3-468f25f5b52d",
//!     "c0bddbd3-5ccb-4376-901c-6e3cf87152fa",
//! )?;
//! let client = ConfigClient::new(config);
//!
//! let envelope = ConfigEnvelope::from(client.get_config("test"));
//! println!("{}", serde_json::to_string(&envelope)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design
//! - No caching, retries, or pooling; every lookup is one request.
//! - The network round-trip sits behind the `Transport` trait. `UreqTransport`
//!   is the blocking default.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use client::ConfigClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{ConfigEnvelope, ConfigResult};
