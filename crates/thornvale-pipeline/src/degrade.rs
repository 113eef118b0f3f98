//! Degradation controller - three-tier health state machine
//!
//! A monitor task feeds the controller queue depth, per-call latency, and
//! failure outcomes; `reevaluate` is the only writer of the tier. Readers
//! sample the current tier under a reader lock on the hot path.

use crate::queue::RequestQueue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thornvale_core::Priority;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceTier {
    Healthy,
    Slow,
    Unavailable,
}

impl ServiceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTier::Healthy => "healthy",
            ServiceTier::Slow => "slow",
            ServiceTier::Unavailable => "unavailable",
        }
    }
}

/// Which static template family to fall back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackDomain {
    Area,
    Dialogue,
    Default,
}

pub fn fallback_template(domain: FallbackDomain) -> &'static str {
    match domain {
        FallbackDomain::Area => {
            "The area stretches out before you, quiet and unremarkable for the moment."
        }
        FallbackDomain::Dialogue => "They nod absently, their attention elsewhere.",
        FallbackDomain::Default => "Nothing about it seems out of the ordinary.",
    }
}

#[derive(Clone, Debug)]
pub struct DegradationConfig {
    /// Median latency above this marks the backend slow.
    pub latency_threshold: Duration,
    /// Queue depth above this fraction of capacity marks the backend slow.
    pub queue_depth_ratio: f64,
    /// Upstream failures within `failure_window` that trip Unavailable.
    pub failure_trip: u32,
    /// Failures only count against health inside this sliding window.
    pub failure_window: Duration,
    /// Consecutive successes required to recover a tier.
    pub recovery_successes: u32,
    /// Rolling latency window length.
    pub latency_window: usize,
}

impl Default for DegradationConfig {
    fn default() -> Self {
        Self {
            latency_threshold: Duration::from_secs(5),
            queue_depth_ratio: 0.8,
            failure_trip: 5,
            failure_window: Duration::from_secs(60),
            recovery_successes: 3,
            latency_window: 20,
        }
    }
}

#[derive(Default)]
struct HealthStats {
    latencies: VecDeque<Duration>,
    /// Timestamps of upstream failures since the last success, pruned to
    /// the configured window.
    failures: VecDeque<Instant>,
    consecutive_successes: u32,
    queue_depth: usize,
    queue_capacity: usize,
}

impl HealthStats {
    fn median_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.latencies.iter().copied().collect();
        sorted.sort();
        sorted[sorted.len() / 2]
    }

    fn prune_failures(&mut self, window: Duration) {
        while let Some(oldest) = self.failures.front() {
            if oldest.elapsed() > window {
                self.failures.pop_front();
            } else {
                break;
            }
        }
    }
}

pub struct DegradationController {
    config: DegradationConfig,
    tier: RwLock<ServiceTier>,
    stats: Mutex<HealthStats>,
}

impl DegradationController {
    pub fn new(config: DegradationConfig) -> Self {
        Self {
            config,
            tier: RwLock::new(ServiceTier::Healthy),
            stats: Mutex::new(HealthStats::default()),
        }
    }

    pub fn tier(&self) -> ServiceTier {
        self.tier
            .read()
            .map(|t| *t)
            .unwrap_or(ServiceTier::Unavailable)
    }

    /// Whether the LLM path should be skipped for this priority right now.
    pub fn should_bypass(&self, priority: Priority) -> bool {
        match self.tier() {
            ServiceTier::Healthy => false,
            ServiceTier::Slow => priority != Priority::Critical,
            ServiceTier::Unavailable => true,
        }
    }

    pub fn record_success(&self, latency: Duration) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.latencies.push_back(latency);
            while stats.latencies.len() > self.config.latency_window {
                stats.latencies.pop_front();
            }
            stats.failures.clear();
            stats.consecutive_successes = stats.consecutive_successes.saturating_add(1);
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.consecutive_successes = 0;
            stats.failures.push_back(Instant::now());
            stats.prune_failures(self.config.failure_window);
        }
    }

    pub fn observe_queue(&self, depth: usize, capacity: usize) {
        if let Ok(mut stats) = self.stats.lock() {
            stats.queue_depth = depth;
            stats.queue_capacity = capacity;
        }
    }

    /// Recompute the tier. Called by the monitor task only.
    pub fn reevaluate(&self) -> ServiceTier {
        let next = {
            let Ok(mut stats) = self.stats.lock() else {
                return self.tier();
            };
            let current = self.tier();

            stats.prune_failures(self.config.failure_window);
            let saturated =
                stats.queue_capacity > 0 && stats.queue_depth >= stats.queue_capacity;
            let deep = stats.queue_capacity > 0
                && stats.queue_depth as f64
                    > stats.queue_capacity as f64 * self.config.queue_depth_ratio;
            let slow = stats.median_latency() > self.config.latency_threshold;

            if stats.failures.len() as u32 >= self.config.failure_trip || saturated {
                ServiceTier::Unavailable
            } else if deep || slow {
                ServiceTier::Slow
            } else if current != ServiceTier::Healthy
                && stats.consecutive_successes < self.config.recovery_successes
            {
                // Degraded tiers recover only after sustained success.
                current
            } else {
                ServiceTier::Healthy
            }
        };

        if let Ok(mut tier) = self.tier.write() {
            if *tier != next {
                match next {
                    ServiceTier::Healthy => info!(tier = next.as_str(), "llm tier recovered"),
                    _ => warn!(tier = next.as_str(), "llm tier degraded"),
                }
                *tier = next;
            }
        }
        next
    }
}

impl Default for DegradationController {
    fn default() -> Self {
        Self::new(DegradationConfig::default())
    }
}

/// Monitor loop: sample queue depth and recompute the tier on an interval.
pub async fn run_monitor(
    controller: Arc<DegradationController>,
    queue: Arc<RequestQueue>,
    interval: Duration,
    quit: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = quit.cancelled() => break,
            _ = ticker.tick() => {
                controller.observe_queue(queue.depth(), queue.capacity() * Priority::ALL.len());
                controller.reevaluate();
            }
        }
    }
}
