//! `StressHarness` — synthesizes orders and pushes them through
//! `BatchPipeline` under controlled load, §4.9.

use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::events::EventBus;
use crate::memory::{MemoryUsageMb, read_memory_usage};
use crate::order::now_ms;
use crate::store::OrderStore;
use crate::validation::{OrderInput, StressTestConfig};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StressResult {
    pub success: bool,
    #[serde(rename = "totalOrders")]
    pub total_orders: u32,
    pub processed: usize,
    pub failed: usize,
    #[serde(rename = "duration_ms")]
    pub duration_ms: u64,
    #[serde(rename = "ordersPerSecond")]
    pub orders_per_second: f64,
    #[serde(rename = "averageLatency_ms")]
    pub average_latency_ms: f64,
    #[serde(rename = "memoryUsage")]
    pub memory_usage: MemoryUsageMb,
    #[serde(rename = "activeConnections")]
    pub active_connections: usize,
    pub timestamp: i64,
}

const STATUSES: [&str; 4] = ["PENDING", "PROCESSING", "COMPLETED", "FAILED"];

fn synthesize_orders(count: u32, now: i64) -> Vec<OrderInput> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| OrderInput {
            id: format!("stress-{now}-{i}"),
            status: STATUSES[rng.gen_range(0..STATUSES.len())].to_string(),
            amount: rng.gen_range(0.0..10_000.0),
            created_at: Some(now),
            updated_at: Some(now),
        })
        .collect()
}

pub fn run_stress_test(store: &OrderStore, events: &EventBus, cfg: StressTestConfig) -> StressResult {
    let start = std::time::Instant::now();
    let now = now_ms();
    let inputs = synthesize_orders(cfg.order_count, now);

    let outcome = crate::pipeline::run_batch(store, events, inputs, cfg.batch_size as usize);

    let duration = start.elapsed();
    let batch_count = outcome.batch_results.len().max(1) as f64;
    let duration_ms = duration.as_millis() as u64;
    let orders_per_second =
        if duration.as_secs_f64() > 0.0 { cfg.order_count as f64 / duration.as_secs_f64() } else { 0.0 };

    StressResult {
        success: outcome.total_failed == 0,
        total_orders: cfg.order_count,
        processed: outcome.total_processed,
        failed: outcome.total_failed,
        duration_ms,
        orders_per_second,
        average_latency_ms: duration_ms as f64 / batch_count,
        memory_usage: read_memory_usage().to_mb(),
        active_connections: events.active_count(),
        timestamp: now_ms(),
    }
}
