//! `AppState` — shared handles threaded through every handler via
//! `axum::extract::State`, following the teacher's `gateway/state.rs`.

use std::time::Instant;

use crate::cache::OrderCache;
use crate::config::AppConfig;
use crate::events::EventBus;
use crate::idempotency::IdempotencyCache;
use crate::metrics::MetricsCounter;
use crate::store::OrderStore;

pub struct AppState {
    pub store: OrderStore,
    pub order_cache: OrderCache,
    pub idempotency_cache: IdempotencyCache,
    pub events: EventBus,
    pub metrics: MetricsCounter,
    pub config: AppConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: OrderStore::new(),
            order_cache: OrderCache::new(),
            idempotency_cache: IdempotencyCache::new(),
            events: EventBus::new(),
            metrics: MetricsCounter::new(),
            config,
            started_at: Instant::now(),
        }
    }
}
