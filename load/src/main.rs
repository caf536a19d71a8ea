//! Stilla load generator
//!
//! Drives synthetic traffic at the host config endpoint and reports request
//! counts, failures and latency.

mod runner;
mod stats;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use stilla_client::{ClientConfig, ConfigClient, UreqTransport};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::runner::LoadPlan;

#[derive(Parser, Debug)]
#[command(name = "stilla-load")]
#[command(about = "Load test the Stilla config endpoint", long_about = None)]
struct Cli {
    /// Base URL of the config service
    #[arg(long, env = "API_HOST", default_value = "http://localhost:8080")]
    api_host: String,

    /// Bearer token sent with every request
    #[arg(
        long,
        env = "API_TOKEN",
        default_value = "cfacd739-4a13-47ae-82c3-13d6d7ffeb2e",
        hide_env_values = true
    )]
    api_token: String,

    /// Host whose configuration is requested
    #[arg(long, env = "HOST_ID", default_value = "9923d21c-dbac-421d-a31a-649a849d4c85")]
    host_id: String,

    /// Config key to request
    #[arg(long, default_value = "kubernetes")]
    key: String,

    /// Number of concurrent simulated users
    #[arg(long, default_value_t = 10)]
    users: usize,

    /// How long to keep generating load
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,

    /// Shortest pause between a user's requests
    #[arg(long, default_value_t = 500)]
    min_wait_ms: u64,

    /// Longest pause between a user's requests
    #[arg(long, default_value_t = 3000)]
    max_wait_ms: u64,

    /// Per-request timeout; ureq's default applies when unset
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn plan(&self) -> Result<LoadPlan> {
        if self.users == 0 {
            bail!("--users must be at least 1");
        }
        if self.min_wait_ms > self.max_wait_ms {
            bail!(
                "--min-wait-ms ({}) exceeds --max-wait-ms ({})",
                self.min_wait_ms,
                self.max_wait_ms
            );
        }
        Ok(LoadPlan {
            key: self.key.clone(),
            users: self.users,
            duration: Duration::from_secs(self.duration_secs),
            wait_ms: self.min_wait_ms..=self.max_wait_ms,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stilla_load=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let plan = cli.plan()?;

    let config = ClientConfig::parse(&cli.api_host, &cli.api_token, &cli.host_id)
        .context("invalid client settings")?;
    info!(base_url = config.base_url(), host_id = %config.host_id(), "loaded configuration");

    let transport = match cli.timeout_ms {
        Some(ms) => UreqTransport::with_timeout(Duration::from_millis(ms)),
        None => UreqTransport::new(),
    };
    let client = Arc::new(ConfigClient::with_transport(config, transport));

    let stats = runner::run(client, &plan)?;
    print!("{stats}");
    Ok(())
}
