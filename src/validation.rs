//! Pure validation functions, no side effects — matching `spec.md` §4.5.
//! These return typed diagnostics rather than bare booleans so the
//! middleware layer (`middleware.rs`) can map failures to the exact
//! response bodies the spec names.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::order::OrderStatus;

pub const MAX_ORDERS_PER_REQUEST: usize = 1000;

/// Shape an individual batch item is deserialized into before the deeper
/// `validate_order` check runs. Kept loosely typed (`status` as `String`,
/// timestamps optional) so malformed input produces the spec's diagnostic
/// messages instead of a generic deserialization error.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderInput {
    pub id: String,
    pub status: String,
    pub amount: f64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<i64>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone)]
pub enum BatchValidationError {
    Invalid(String),
    PayloadTooLarge(String),
}

/// `validateOrder` — id non-empty, status in the four-value set, amount
/// finite and non-negative, both timestamps positive.
pub fn validate_order(input: &OrderInput) -> bool {
    !input.id.is_empty()
        && OrderStatus::parse(&input.status).is_some()
        && input.amount.is_finite()
        && input.amount >= 0.0
        && input.created_at.is_some_and(|t| t > 0)
        && input.updated_at.is_some_and(|t| t > 0)
}

/// `validateOrdersInput` — shape-level check on the raw JSON body. Parses
/// each item into an `OrderInput` only after the shape checks pass, so the
/// diagnostic strings match `spec.md` §4.5 exactly regardless of how serde
/// would otherwise report the same malformed input.
pub fn validate_orders_input(body: &Value) -> Result<Vec<OrderInput>, BatchValidationError> {
    let items = body
        .as_array()
        .ok_or_else(|| BatchValidationError::Invalid("Body must be an array".to_string()))?;

    if items.is_empty() {
        return Err(BatchValidationError::Invalid("Orders array cannot be empty".to_string()));
    }

    if items.len() > MAX_ORDERS_PER_REQUEST {
        return Err(BatchValidationError::PayloadTooLarge(
            "Maximum 1000 orders allowed per request".to_string(),
        ));
    }

    let mut inputs = Vec::with_capacity(items.len());
    for item in items {
        let obj = item
            .as_object()
            .ok_or_else(|| BatchValidationError::Invalid("All items must be objects".to_string()))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BatchValidationError::Invalid(
                    "All orders must have a valid id (string)".to_string(),
                )
            })?
            .to_string();

        let status = obj
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BatchValidationError::Invalid(
                    "All orders must have a valid status (string)".to_string(),
                )
            })?
            .to_string();

        let amount = obj
            .get("amount")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                BatchValidationError::Invalid(
                    "All orders must have a valid amount (number)".to_string(),
                )
            })?;

        let created_at = obj.get("createdAt").and_then(Value::as_i64);
        let updated_at = obj.get("updatedAt").and_then(Value::as_i64);

        inputs.push(OrderInput { id, status, amount, created_at, updated_at });
    }

    Ok(inputs)
}

/// `validateBatchSize` — defaults to the configured `BATCH_SIZE`; rejects
/// values outside `[1, 1000]`.
pub fn validate_batch_size(n: Option<i64>, default: u32) -> Result<u32, String> {
    match n {
        None => Ok(default),
        Some(v) if v < 1 || v > 1000 => {
            Err("Batch size must be between 1 and 1000".to_string())
        }
        Some(v) => Ok(v as u32),
    }
}

/// `validateOrderId` — non-empty, `^[A-Za-z0-9_-]{1,128}$`. Hand-rolled
/// char-class check rather than a `regex`/`once_cell` static, since the
/// pattern is simple enough not to need a regex engine.
pub fn validate_token_format(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 128
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Clone, Copy, ToSchema)]
pub struct StressTestConfig {
    pub order_count: u32,
    pub batch_size: u32,
    pub concurrent_batches: u32,
}

/// `validateStressTestConfig` — `orderCount` defaults to 1000 in `[1,
/// 10000]`; `batchSize` defaults to 100 in `[1, 1000]`; `concurrentBatches`
/// defaults to 1.
pub fn validate_stress_test_config(body: &Value) -> Result<StressTestConfig, String> {
    let obj = body.as_object();

    let order_count = match obj.and_then(|o| o.get("orderCount")) {
        None | Some(Value::Null) => 1000,
        Some(v) => {
            let n = v.as_i64().ok_or_else(|| "orderCount must be a number".to_string())?;
            if !(1..=10_000).contains(&n) {
                return Err("orderCount must be between 1 and 10000".to_string());
            }
            n as u32
        }
    };

    let batch_size = match obj.and_then(|o| o.get("batchSize")) {
        None | Some(Value::Null) => 100,
        Some(v) => {
            let n = v.as_i64().ok_or_else(|| "batchSize must be a number".to_string())?;
            if !(1..=1000).contains(&n) {
                return Err("batchSize must be between 1 and 1000".to_string());
            }
            n as u32
        }
    };

    let concurrent_batches = match obj.and_then(|o| o.get("concurrentBatches")) {
        None | Some(Value::Null) => 1,
        Some(v) => v.as_i64().filter(|n| *n >= 1).map(|n| n as u32).unwrap_or(1),
    };

    Ok(StressTestConfig { order_count, batch_size, concurrent_batches })
}
