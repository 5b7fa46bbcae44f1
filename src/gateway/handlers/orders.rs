//! Order handlers: batch ingest, read-through get, status mutation,
//! stress-test trigger. Shaped after the teacher's
//! `gateway/handlers/order.rs` (`State<Arc<AppState>>` + `Extension<...>`
//! extractors, `#[utoipa::path]` annotations).

use std::sync::Arc;

use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, http::header};
use serde_json::json;

use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::middleware::{IdempotencyKey, ValidatedOrders, ValidatedStressConfig, validate_path_id};
use crate::order::OrderStatus;
use crate::pipeline::run_batch;
use crate::stress::run_stress_test;
use crate::validation::validate_batch_size;

/// `POST /api/orders/batch` — reached only on an idempotency-cache miss;
/// the gate middleware writes whatever this returns back into the cache.
#[utoipa::path(
    post,
    path = "/api/orders/batch",
    request_body = Vec<crate::validation::OrderInput>,
    responses((status = 201, description = "Batch accepted")),
    tag = "Orders"
)]
pub async fn post_batch(
    State(state): State<Arc<AppState>>,
    Extension(_key): Extension<IdempotencyKey>,
    Extension(orders): Extension<ValidatedOrders>,
) -> impl IntoResponse {
    let chunk_size = validate_batch_size(None, state.config.batch_size)
        .expect("None always resolves to the configured default");

    let inputs = (*orders.0).clone();
    let ids: Vec<String> = inputs.iter().map(|o| o.id.clone()).collect();

    let outcome = run_batch(&state.store, &state.events, inputs, chunk_size as usize);

    // Cache-after-batch: prime OrderCache for every input id now present in
    // the store, so the first subsequent read is a HIT.
    for id in &ids {
        if let Some(order) = state.store.get_by_id(id) {
            state.order_cache.set(id, order, None);
        }
    }

    let body = json!({
        "success": outcome.total_failed == 0,
        "total": ids.len(),
        "processed": outcome.total_processed,
        "failed": outcome.total_failed,
        "batches": outcome.batch_results.len(),
        "batchResults": outcome.batch_results,
    });

    (StatusCode::CREATED, Json(body))
}

/// `GET /api/orders/:id` — consults `OrderCache` first, falls back to
/// `OrderStore` on miss and primes the cache.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path)),
    responses(
        (status = 200, description = "Order found", body = crate::order::Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    validate_path_id(&id)?;

    let mut headers = HeaderMap::new();

    if let Some(order) = state.order_cache.get(&id) {
        headers.insert("X-Cache", header::HeaderValue::from_static("HIT"));
        let age = state.order_cache.age_seconds(&id).unwrap_or(0);
        headers.insert(
            "X-Cache-Age",
            header::HeaderValue::from_str(&age.to_string()).expect("digits are valid header chars"),
        );
        return Ok((headers, Json(order)).into_response());
    }

    match state.store.get_by_id(&id) {
        Some(order) => {
            state.order_cache.set(&id, order.clone(), None);
            headers.insert("X-Cache", header::HeaderValue::from_static("MISS"));
            Ok((headers, Json(order)).into_response())
        }
        None => Err(ApiError::not_found()),
    }
}

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// `PUT /api/orders/:id/status` — invalidate-then-prime cache ordering per
/// §4.8, so a concurrent reader never observes a stale entry after the
/// store has moved forward.
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = String, Path)),
    request_body = UpdateStatusBody,
    responses(
        (status = 200, description = "Order updated", body = crate::order::Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate_path_id(&id)?;

    let new_status = OrderStatus::parse(&body.status)
        .ok_or_else(|| ApiError::bad_request(format!("Invalid status '{}'", body.status)))?;

    match state.store.update_status(&id, new_status) {
        Some(updated) => {
            state.order_cache.invalidate(&id);
            state.order_cache.set(&id, updated.clone(), None);
            state.events.publish_status_changed(updated.clone());
            Ok(Json(updated))
        }
        None => Err(ApiError::not_found()),
    }
}

/// `POST /api/orders/stress-test` — runs `StressHarness` synchronously;
/// every step it invokes (`BatchPipeline`) is in-memory and non-blocking.
#[utoipa::path(
    post,
    path = "/api/orders/stress-test",
    responses((status = 200, description = "Stress test result", body = crate::stress::StressResult)),
    tag = "Stress"
)]
pub async fn stress_test(
    State(state): State<Arc<AppState>>,
    Extension(cfg): Extension<ValidatedStressConfig>,
) -> impl IntoResponse {
    let result = run_stress_test(&state.store, &state.events, cfg.0);
    Json(result)
}
