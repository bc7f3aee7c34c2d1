//! Performance Monitor
//!
//! Bounded ring buffer of request samples plus cumulative error and cache
//! counters. Statistics cover the last wall-clock hour of samples only.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::monitor::{HealthStatus, PerformanceSample};

/// Per-endpoint aggregates over the stats window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStats {
    pub calls: usize,
    pub avg_latency_ms: f64,
    /// Percent of successful calls
    pub success_rate: f64,
    /// Failures since startup
    pub errors: u64,
}

// == Monitor Stats ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub uptime_hours: f64,
    /// Samples currently retained
    pub total_requests: usize,
    /// Samples within the last hour
    pub requests_per_hour: usize,
    pub avg_latency_ms: f64,
    /// Percent; 100 when the window is empty
    pub success_rate: f64,
    /// Percent of cache lookups that hit
    pub cache_hit_rate: f64,
    pub total_errors: u64,
    pub per_endpoint: BTreeMap<String, EndpointStats>,
    pub health: HealthStatus,
}

#[derive(Debug)]
struct MonitorState {
    samples: VecDeque<PerformanceSample>,
    capacity: usize,
    errors: HashMap<String, u64>,
    cache_hits: u64,
    cache_misses: u64,
}

// == Performance Monitor ==
#[derive(Debug)]
pub struct PerformanceMonitor {
    state: Mutex<MonitorState>,
    started_at: DateTime<Utc>,
}

impl PerformanceMonitor {
    /// Creates a monitor retaining at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(MonitorState {
                samples: VecDeque::with_capacity(capacity.min(4096)),
                capacity,
                errors: HashMap::new(),
                cache_hits: 0,
                cache_misses: 0,
            }),
            started_at: Utc::now(),
        }
    }

    // == Record ==
    /// Records one call of `endpoint`.
    pub fn record(&self, endpoint: &str, duration: Duration, success: bool) {
        self.record_sample(PerformanceSample::new(endpoint, duration, success));
    }

    /// Appends a prepared sample, dropping the oldest on overflow.
    pub fn record_sample(&self, sample: PerformanceSample) {
        let mut state = self.state.lock();
        if state.capacity == 0 {
            return;
        }
        if !sample.success {
            *state.errors.entry(sample.endpoint.clone()).or_insert(0) += 1;
        }
        if state.samples.len() >= state.capacity {
            state.samples.pop_front();
        }
        state.samples.push_back(sample);
    }

    pub fn record_cache_hit(&self) {
        self.state.lock().cache_hits += 1;
    }

    pub fn record_cache_miss(&self) {
        self.state.lock().cache_misses += 1;
    }

    // == Time ==
    /// Runs `f`, recording its duration and whether it returned `Ok`.
    pub fn time<T, E, F>(&self, endpoint: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();
        debug!("{} took {:?}", endpoint, elapsed);
        self.record(endpoint, elapsed, result.is_ok());
        result
    }

    // == Stats ==
    pub fn stats(&self) -> MonitorStats {
        self.stats_at(Utc::now())
    }

    /// Statistics as seen at `now`; the window is the hour before it.
    pub fn stats_at(&self, now: DateTime<Utc>) -> MonitorStats {
        let state = self.state.lock();
        let hour_ago = now - chrono::Duration::hours(1);
        let window: Vec<&PerformanceSample> = state
            .samples
            .iter()
            .filter(|sample| sample.timestamp > hour_ago)
            .collect();

        let (avg_latency_ms, success_rate) = summarize(&window);

        let mut grouped: BTreeMap<&str, Vec<&PerformanceSample>> = BTreeMap::new();
        for sample in &window {
            grouped
                .entry(sample.endpoint.as_str())
                .or_default()
                .push(sample);
        }
        let per_endpoint = grouped
            .into_iter()
            .map(|(endpoint, samples)| {
                let (avg, rate) = summarize(&samples);
                let stats = EndpointStats {
                    calls: samples.len(),
                    avg_latency_ms: avg,
                    success_rate: rate,
                    errors: state.errors.get(endpoint).copied().unwrap_or(0),
                };
                (endpoint.to_string(), stats)
            })
            .collect();

        let lookups = state.cache_hits + state.cache_misses;
        let cache_hit_rate = if lookups == 0 {
            0.0
        } else {
            state.cache_hits as f64 / lookups as f64 * 100.0
        };

        let uptime = now.signed_duration_since(self.started_at);
        MonitorStats {
            uptime_hours: uptime.num_milliseconds().max(0) as f64 / 3_600_000.0,
            total_requests: state.samples.len(),
            requests_per_hour: window.len(),
            avg_latency_ms,
            success_rate,
            cache_hit_rate,
            total_errors: state.errors.values().sum(),
            per_endpoint,
            health: HealthStatus::classify(avg_latency_ms, success_rate),
        }
    }
}

/// Mean latency and success percentage; an empty window is fully healthy.
fn summarize(samples: &[&PerformanceSample]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 100.0);
    }
    let count = samples.len() as f64;
    let total_ms: f64 = samples.iter().map(|sample| sample.duration_ms).sum();
    let successes = samples.iter().filter(|sample| sample.success).count() as f64;
    (total_ms / count, successes / count * 100.0)
}
