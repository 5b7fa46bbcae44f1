//! `MetricsCounter` — monotone request/latency counters, §4.10.
//!
//! Follows the teacher's atomic-counter idiom (`gateway/state.rs`'s
//! `order_id_gen`, `websocket/connection.rs`'s `next_conn_id`): two
//! `AtomicU64`s updated from a middleware layer wrapping every route,
//! no locks needed since each field is independently monotone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use utoipa::ToSchema;

pub struct MetricsCounter {
    request_count: AtomicU64,
    total_response_nanos: AtomicU64,
    started_at: Instant,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    #[serde(rename = "requestCount")]
    pub request_count: u64,
    #[serde(rename = "avgResponseTimeMs")]
    pub avg_response_time_ms: u64,
    #[serde(rename = "uptime_s")]
    pub uptime_s: u64,
}

impl Default for MetricsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCounter {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            total_response_nanos: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record(&self, elapsed: Duration) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_response_nanos.fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let count = self.request_count.load(Ordering::Relaxed);
        let total_nanos = self.total_response_nanos.load(Ordering::Relaxed);
        let avg_response_time_ms = if count == 0 { 0 } else { (total_nanos / count) / 1_000_000 };
        MetricsSnapshot {
            request_count: count,
            avg_response_time_ms,
            uptime_s: self.started_at.elapsed().as_secs(),
        }
    }

    /// Test-only.
    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.total_response_nanos.store(0, Ordering::Relaxed);
    }
}
