//! Barrier-synchronized race harness with timing metrics.
//!
//! Every racer waits on a shared barrier, fires one request, and records
//! when it started and finished. The collector turns those timings into a
//! [`RaceStatistics`] snapshot that can be logged, checked against
//! thresholds, and written to disk as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const CONCURRENT_THREADS: usize = 10;
pub const DEFAULT_BARRIER_TIMEOUT_SECS: u64 = 30;
pub const MAX_BARRIER_WAIT_THRESHOLD: Duration = Duration::from_secs(45);
pub const MIN_REQUEST_SPREAD_THRESHOLD_MS: f64 = 5.0;

/// Under the package root unless `RACE_TEST_METRICS_DIR` says otherwise.
pub const DEFAULT_METRICS_DIR: &str = "target/test_metrics/race_conditions";

#[derive(Debug, Clone)]
pub struct RaceConfig {
    pub concurrent_threads: usize,
    pub barrier_timeout: Duration,
    pub metrics_enabled: bool,
    pub max_barrier_wait: Duration,
    pub min_request_spread_ms: f64,
    pub metrics_dir: PathBuf,
}

impl RaceConfig {
    /// Read `RACE_TEST_BARRIER_TIMEOUT` (seconds), `RACE_TEST_METRICS` and
    /// `RACE_TEST_METRICS_DIR`.
    ///
    /// A relative metrics directory is resolved against the package root so
    /// reports land in the same place whatever the working directory.
    pub fn from_env() -> Self {
        let barrier_timeout = std::env::var("RACE_TEST_BARRIER_TIMEOUT")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_BARRIER_TIMEOUT_SECS);

        let metrics_enabled = std::env::var("RACE_TEST_METRICS")
            .map(|value| parse_bool(&value))
            .unwrap_or(true);

        let metrics_dir = std::env::var("RACE_TEST_METRICS_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_METRICS_DIR));
        let metrics_dir = if metrics_dir.is_absolute() {
            metrics_dir
        } else {
            Path::new(env!("CARGO_MANIFEST_DIR")).join(metrics_dir)
        };

        Self {
            concurrent_threads: CONCURRENT_THREADS,
            barrier_timeout: Duration::from_secs(barrier_timeout),
            metrics_enabled,
            max_barrier_wait: MAX_BARRIER_WAIT_THRESHOLD,
            min_request_spread_ms: MIN_REQUEST_SPREAD_THRESHOLD_MS,
            metrics_dir,
        }
    }
}

pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestTiming {
    pub racer: usize,
    pub start_ms: f64,
    pub end_ms: f64,
    pub duration_ms: f64,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceStatistics {
    pub barrier_wait_ms: Option<f64>,
    pub request_spread_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub avg_duration_ms: f64,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_requests: usize,
}

#[derive(Debug, Serialize)]
struct RaceReport<'a> {
    test_id: &'a str,
    thread_count: usize,
    recorded_at: DateTime<Utc>,
    statistics: RaceStatistics,
    requests: Vec<RequestTiming>,
}

#[derive(Debug, Default)]
struct BarrierWindow {
    started: Option<Instant>,
    ended: Option<Instant>,
}

/// Shared across racers behind an `Arc`.
#[derive(Debug)]
pub struct RaceMetricsCollector {
    origin: Instant,
    barrier: Mutex<BarrierWindow>,
    requests: Mutex<Vec<RequestTiming>>,
}

impl Default for RaceMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceMetricsCollector {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            barrier: Mutex::new(BarrierWindow::default()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn offset_ms(&self, at: Instant) -> f64 {
        at.saturating_duration_since(self.origin).as_secs_f64() * 1000.0
    }

    /// First caller wins.
    pub fn start_barrier_wait(&self) {
        let mut window = self.barrier.lock().unwrap();
        window.started.get_or_insert_with(Instant::now);
    }

    /// Last caller wins, so the window covers the slowest racer.
    pub fn end_barrier_wait(&self) {
        self.barrier.lock().unwrap().ended = Some(Instant::now());
    }

    pub fn record_request(&self, racer: usize, start: Instant, end: Instant, status: u16) {
        let start_ms = self.offset_ms(start);
        let end_ms = self.offset_ms(end);
        self.requests.lock().unwrap().push(RequestTiming {
            racer,
            start_ms,
            end_ms,
            duration_ms: end_ms - start_ms,
            status,
        });
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn statistics(&self) -> RaceStatistics {
        let requests = self.requests.lock().unwrap();
        let window = self.barrier.lock().unwrap();

        let barrier_wait_ms = match (window.started, window.ended) {
            (Some(started), Some(ended)) => {
                Some(ended.saturating_duration_since(started).as_secs_f64() * 1000.0)
            }
            _ => None,
        };

        if requests.is_empty() {
            return RaceStatistics {
                barrier_wait_ms,
                request_spread_ms: 0.0,
                min_duration_ms: 0.0,
                max_duration_ms: 0.0,
                avg_duration_ms: 0.0,
                success_count: 0,
                failure_count: 0,
                total_requests: 0,
            };
        }

        let first_start = requests.iter().map(|r| r.start_ms).fold(f64::MAX, f64::min);
        let last_start = requests.iter().map(|r| r.start_ms).fold(f64::MIN, f64::max);
        let min_duration = requests
            .iter()
            .map(|r| r.duration_ms)
            .fold(f64::MAX, f64::min);
        let max_duration = requests
            .iter()
            .map(|r| r.duration_ms)
            .fold(f64::MIN, f64::max);
        let total_duration: f64 = requests.iter().map(|r| r.duration_ms).sum();
        let success_count = requests.iter().filter(|r| r.status == 200).count();

        RaceStatistics {
            barrier_wait_ms,
            request_spread_ms: last_start - first_start,
            min_duration_ms: min_duration,
            max_duration_ms: max_duration,
            avg_duration_ms: total_duration / requests.len() as f64,
            success_count,
            failure_count: requests.len() - success_count,
            total_requests: requests.len(),
        }
    }

    /// Write `<test_id>_<timestamp>.json` under `dir` and return its path.
    pub fn save_to_json(&self, dir: &Path, test_id: &str, thread_count: usize) -> Result<PathBuf> {
        let recorded_at = Utc::now();
        let report = RaceReport {
            test_id,
            thread_count,
            recorded_at,
            statistics: self.statistics(),
            requests: self.requests.lock().unwrap().clone(),
        };

        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create metrics directory {}", dir.display()))?;

        let file_name = format!("{}_{}.json", test_id, recorded_at.format("%Y%m%d_%H%M%S%.3f"));
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize race metrics")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write race metrics to {}", path.display()))?;

        info!("Race metrics saved to {}", path.display());
        Ok(path)
    }

    pub fn log_summary(&self, test_id: &str) {
        let stats = self.statistics();
        info!("Race summary for {}", test_id);
        if let Some(wait) = stats.barrier_wait_ms {
            info!("  Barrier wait: {:.2} ms", wait);
        }
        info!("  Request spread: {:.2} ms", stats.request_spread_ms);
        info!(
            "  Duration min/avg/max: {:.2}/{:.2}/{:.2} ms",
            stats.min_duration_ms, stats.avg_duration_ms, stats.max_duration_ms
        );
        info!(
            "  Results: {} succeeded, {} failed, {} total",
            stats.success_count, stats.failure_count, stats.total_requests
        );
    }

    /// Return a warning per threshold the run violated.
    ///
    /// Violations are logged but never fail a test: a narrow spread means
    /// the race was weak, not that the service misbehaved.
    pub fn check_thresholds(&self, config: &RaceConfig) -> Vec<String> {
        let stats = self.statistics();
        let mut violations = Vec::new();

        if let Some(wait) = stats.barrier_wait_ms {
            if wait > config.max_barrier_wait.as_secs_f64() * 1000.0 {
                violations.push(format!(
                    "Barrier wait {:.2} ms exceeds {:?}",
                    wait, config.max_barrier_wait
                ));
            }
        }

        if stats.total_requests > 1 && stats.request_spread_ms < config.min_request_spread_ms {
            violations.push(format!(
                "Request spread {:.2} ms is below {:.2} ms",
                stats.request_spread_ms, config.min_request_spread_ms
            ));
        }

        for violation in &violations {
            warn!("⚠ {}", violation);
        }
        violations
    }
}
