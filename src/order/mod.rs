//! Order domain types: the record, its status enum, and the event envelope
//! published to `EventBus` subscribers.
//!
//! Mirrors the teacher's closed-enum pattern for protocol-facing state
//! (`core_types::OrderStatus`, `core_types::Side`), generalized to the four
//! statuses this spec names.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl OrderStatus {
    /// Parses one of the four spec-literal uppercase status strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "PROCESSING" => Some(OrderStatus::Processing),
            "COMPLETED" => Some(OrderStatus::Completed),
            "FAILED" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub amount: f64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// Order lifecycle event, internally tagged by `kind` so the wire shape is
/// exactly `{kind, order, timestamp}` as `spec.md` §3 names it.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderEvent {
    Created { order: Order, timestamp: i64 },
    Updated { order: Order, timestamp: i64 },
    StatusChanged { order: Order, timestamp: i64 },
}

impl OrderEvent {
    pub fn created(order: Order, timestamp: i64) -> Self {
        OrderEvent::Created { order, timestamp }
    }

    pub fn updated(order: Order, timestamp: i64) -> Self {
        OrderEvent::Updated { order, timestamp }
    }

    pub fn status_changed(order: Order, timestamp: i64) -> Self {
        OrderEvent::StatusChanged { order, timestamp }
    }

    /// The SSE `event:` line value — `order.<kind>`, matching S6's
    /// `event: order.created` framing.
    pub fn sse_event_name(&self) -> &'static str {
        match self {
            OrderEvent::Created { .. } => "order.created",
            OrderEvent::Updated { .. } => "order.updated",
            OrderEvent::StatusChanged { .. } => "order.status_changed",
        }
    }
}

/// Current epoch milliseconds, following the teacher's
/// `gateway/handlers/helpers.rs::now_ms` idiom.
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
