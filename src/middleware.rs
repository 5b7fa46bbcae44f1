//! `MiddlewareChain` — per-endpoint preconditions, §4.7.
//!
//! The idempotency gate's shape (read header → validate format → cache
//! lookup → attach key to request extensions → let the handler run → write
//! the final response back into the cache) is grounded on
//! `examples/other_examples`' `idempotency_middleware`, with one deliberate
//! divergence: that reference rejects a key replayed against a different
//! request body with `409`; this spec's open question (§9) resolves in
//! favor of lenient replay — the cached response always wins. The
//! `axum::middleware::from_fn_with_state` shape itself matches the
//! teacher's `gateway_auth_middleware` in `gateway/mod.rs`.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::error::ApiError;
use crate::gateway::state::AppState;
use crate::validation::{
    BatchValidationError, StressTestConfig, validate_orders_input, validate_stress_test_config,
    validate_token_format,
};

/// Attached to the request on an idempotency-cache miss so the handler (or
/// this same middleware, after `next.run`) knows which key to write the
/// final response under.
#[derive(Clone)]
pub struct IdempotencyKey(pub String);

/// The batch validator's output, attached to the request on success so the
/// handler can skip re-parsing the body.
#[derive(Clone)]
pub struct ValidatedOrders(pub Arc<Vec<crate::validation::OrderInput>>);

#[derive(Clone)]
pub struct ValidatedStressConfig(pub StressTestConfig);

fn extract_idempotency_key(headers: &HeaderMap) -> Result<String, ApiError> {
    let raw = headers
        .get("Idempotency-Key")
        .ok_or_else(|| {
            ApiError::bad_request_with_detail(
                "Idempotency-Key header is required",
                "Missing required header: Idempotency-Key",
            )
        })?
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid idempotency key format. Must be 1-128 alphanumeric characters, hyphens, or underscores."))?
        .to_string();

    if !validate_token_format(&raw) {
        return Err(ApiError::bad_request(
            "Invalid idempotency key format. Must be 1-128 alphanumeric characters, hyphens, or underscores.",
        ));
    }

    Ok(raw)
}

fn json_response(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    (status, axum::Json(body)).into_response()
}

/// Idempotency gate for `POST /orders/batch`. Wraps the handler: on a cache
/// hit, replays the stored response and never invokes the handler at all
/// (invariant #2); on a miss, lets the handler run and then writes whatever
/// it produced — success or error — into the cache under the request's key.
pub async fn idempotency_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let key = match extract_idempotency_key(req.headers()) {
        Ok(key) => key,
        Err(err) => return err.into_response(),
    };

    if let Some((status, body)) = state.idempotency_cache.get(&key) {
        return json_response(status, body);
    }

    req.extensions_mut().insert(IdempotencyKey(key.clone()));

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let status = parts.status.as_u16();
    let json_body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state.idempotency_cache.set(key, status, json_body, None);

    Response::from_parts(parts, Body::from(bytes))
}

/// Batch validator for `POST /orders/batch`. Runs after the idempotency
/// gate (it is only reached on a cache miss) and before the handler.
pub async fn batch_validate_middleware(mut req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(_) => return ApiError::bad_request("Body must be an array").into_response(),
    };

    let value: Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(_) => return ApiError::bad_request("Body must be an array").into_response(),
    };

    match validate_orders_input(&value) {
        Ok(inputs) => {
            let mut req = Request::from_parts(parts, Body::empty());
            req.extensions_mut().insert(ValidatedOrders(Arc::new(inputs)));
            next.run(req).await
        }
        Err(BatchValidationError::Invalid(message)) => ApiError::bad_request(message).into_response(),
        Err(BatchValidationError::PayloadTooLarge(message)) => {
            ApiError::payload_too_large(message).into_response()
        }
    }
}

/// Stress-test validator for `POST /orders/stress-test`.
pub async fn stress_validate_middleware(mut req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let value: Value = if bytes.is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(_) => return ApiError::bad_request("Body must be a JSON object").into_response(),
        }
    };

    match validate_stress_test_config(&value) {
        Ok(cfg) => {
            let mut req = Request::from_parts(parts, Body::empty());
            req.extensions_mut().insert(ValidatedStressConfig(cfg));
            next.run(req).await
        }
        Err(message) => ApiError::bad_request(message).into_response(),
    }
}

/// Id validator — `spec.md` frames this as a middleware step, but axum
/// path-param extraction inside a generic `from_fn` layer requires
/// duplicating route matching; it is applied instead as the first thing
/// each path-keyed handler does, calling this same `validate_token_format`
/// function the batch-key gate uses. Behaviorally equivalent: it still
/// short-circuits before any store/cache access on a malformed id.
pub fn validate_path_id(id: &str) -> Result<(), ApiError> {
    if validate_token_format(id) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Invalid order id '{id}'. Must be 1-128 alphanumeric characters, hyphens, or underscores."
        )))
    }
}
