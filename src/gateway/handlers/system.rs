//! `GET /api/system/{health,memory,performance}` — process-level endpoints,
//! adapted from the teacher's `gateway/handlers/health.rs` shape (a small
//! `State<Arc<AppState>>` handler returning a literal JSON envelope) but
//! without its TDengine liveness ping, since this service has no external
//! dependency to probe (§1's non-goals: durable persistence is out of
//! scope).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::gateway::state::AppState;
use crate::memory::read_memory_usage;
use crate::order::now_ms;

#[utoipa::path(get, path = "/api/system/health", responses((status = 200, description = "Service healthy")), tag = "System")]
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": now_ms() }))
}

#[utoipa::path(get, path = "/api/system/memory", responses((status = 200, description = "Process memory usage", body = crate::memory::MemoryUsage)), tag = "System")]
pub async fn memory() -> Json<crate::memory::MemoryUsage> {
    Json(read_memory_usage())
}

#[utoipa::path(get, path = "/api/system/performance", responses((status = 200, description = "Request metrics")), tag = "System")]
pub async fn performance(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let snapshot = state.metrics.snapshot();
    Json(json!({
        "latencyMs": snapshot.avg_response_time_ms,
        "systemHealth": 100,
        "requestsPerSecond": 0,
        "requestCount": snapshot.request_count,
        "avgResponseTimeMs": snapshot.avg_response_time_ms,
        "uptime_s": snapshot.uptime_s,
        "memoryUsage": read_memory_usage(),
        "timestamp": now_ms(),
    }))
}
