//! Request outcome aggregation for a load run.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Outcomes recorded by one or more simulated users.
#[derive(Debug, Default, Clone)]
pub struct LoadStats {
    latencies: Vec<Duration>,
    failures: BTreeMap<String, u64>,
}

impl LoadStats {
    pub fn record<T, E: fmt::Display>(&mut self, elapsed: Duration, outcome: &Result<T, E>) {
        self.latencies.push(elapsed);
        if let Err(err) = outcome {
            *self.failures.entry(err.to_string()).or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: LoadStats) {
        self.latencies.extend(other.latencies);
        for (message, count) in other.failures {
            *self.failures.entry(message).or_default() += count;
        }
    }

    pub fn requests(&self) -> u64 {
        u64::try_from(self.latencies.len()).unwrap_or(u64::MAX)
    }

    pub fn failed(&self) -> u64 {
        self.failures.values().sum()
    }

    pub fn failures(&self) -> &BTreeMap<String, u64> {
        &self.failures
    }

    pub fn summary(&self) -> Option<LatencySummary> {
        if self.latencies.is_empty() {
            return None;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        let total: Duration = sorted.iter().sum();
        let count = u32::try_from(sorted.len()).unwrap_or(u32::MAX);
        Some(LatencySummary {
            min: sorted[0],
            mean: total / count,
            p50: percentile(&sorted, 50),
            p95: percentile(&sorted, 95),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Nearest-rank percentile over an ascending, non-empty slice.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted[rank - 1]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub min: Duration,
    pub mean: Duration,
    pub p50: Duration,
    pub p95: Duration,
    pub max: Duration,
}

impl fmt::Display for LoadStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "requests: {}", self.requests())?;
        writeln!(f, "failures: {}", self.failed())?;
        for (message, count) in &self.failures {
            writeln!(f, "  {count:>6}  {message}")?;
        }
        if let Some(s) = self.summary() {
            writeln!(
                f,
                "latency: min {:?}  mean {:?}  p50 {:?}  p95 {:?}  max {:?}",
                s.min, s.mean, s.p50, s.p95, s.max
            )?;
        }
        Ok(())
    }
}
