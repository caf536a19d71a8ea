//! Simulated users hammering the config endpoint.
//!
//! Each user is an OS thread sharing one `ConfigClient`. A user issues one
//! lookup, records the outcome, sleeps a random think time, and repeats
//! until the deadline passes. Any non-2xx status counts as a failure, even
//! when the body is JSON.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use rand::Rng;
use serde_json::Value;
use stilla_client::{ConfigClient, Transport};
use tracing::{debug, info};

use crate::stats::LoadStats;

#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub key: String,
    pub users: usize,
    pub duration: Duration,
    pub wait_ms: RangeInclusive<u64>,
}

pub fn run<T>(client: Arc<ConfigClient<T>>, plan: &LoadPlan) -> Result<LoadStats>
where
    T: Transport + 'static,
{
    let deadline = Instant::now() + plan.duration;
    info!(users = plan.users, key = %plan.key, duration = ?plan.duration, "starting load run");

    let handles: Vec<_> = (0..plan.users)
        .map(|user| {
            let client = Arc::clone(&client);
            let key = plan.key.clone();
            let wait_ms = plan.wait_ms.clone();
            thread::Builder::new()
                .name(format!("user-{user}"))
                .spawn(move || simulate_user(&client, &key, wait_ms, deadline))
        })
        .collect::<std::io::Result<_>>()?;

    let mut total = LoadStats::default();
    for handle in handles {
        let stats = handle
            .join()
            .map_err(|_| anyhow!("simulated user panicked"))?;
        total.merge(stats);
    }
    Ok(total)
}

fn simulate_user<T: Transport>(
    client: &ConfigClient<T>,
    key: &str,
    wait_ms: RangeInclusive<u64>,
    deadline: Instant,
) -> LoadStats {
    let mut rng = rand::rng();
    let mut stats = LoadStats::default();

    while Instant::now() < deadline {
        let started = Instant::now();
        let outcome = request_once(client, key);
        let elapsed = started.elapsed();
        debug!(?elapsed, ok = outcome.is_ok(), "request finished");
        stats.record(elapsed, &outcome);

        let pause = Duration::from_millis(rng.random_range(wait_ms.clone()));
        if Instant::now() + pause >= deadline {
            break;
        }
        thread::sleep(pause);
    }
    stats
}

/// One lookup, failing on any non-2xx status before the body is decoded.
fn request_once<T: Transport>(client: &ConfigClient<T>, key: &str) -> Result<Value> {
    let response = client.send_get_config(key)?;
    if !response.is_success() {
        return Err(anyhow!("HTTP {}", response.status));
    }
    Ok(client.parse_get_config(response)?)
}
