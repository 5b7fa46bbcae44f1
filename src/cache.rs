//! `OrderCache` — a TTL-bounded read accelerator over `OrderStore`.
//!
//! The teacher memoizes DB reads with the `cached` crate's `#[cached(time =
//! ..)]` macro (`gateway/cache.rs`). That macro only wraps a pure function's
//! return value; it has no `invalidate`/`set` entry points, so it cannot
//! support the explicit prime-and-invalidate write path §4.6/§4.8 require.
//! This hand-rolls the same stamp-on-write, check-on-read, default-TTL
//! contract over a `DashMap<String, Entry>` keyed by order id, the way
//! `other_examples`' `spineldb` `CacheState` and `jwks-cache`
//! `CacheManager` do for their own TTL maps.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::order::Order;

const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    order: Order,
    cached_at: Instant,
    expires_at: Instant,
}

#[derive(Default)]
pub struct OrderCache {
    entries: DashMap<String, Entry>,
}

impl OrderCache {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    /// Returns the cached snapshot if present and unexpired; otherwise
    /// evicts the (possibly stale) entry and returns `None`.
    pub fn get(&self, id: &str) -> Option<Order> {
        let now = Instant::now();
        let hit = self.entries.get(id).filter(|e| e.expires_at > now).map(|e| e.order.clone());
        if hit.is_none() {
            self.entries.remove(id);
        }
        hit
    }

    pub fn set(&self, id: &str, order: Order, ttl: Option<Duration>) {
        let now = Instant::now();
        let ttl = ttl.unwrap_or(DEFAULT_TTL);
        self.entries.insert(
            id.to_string(),
            Entry { order, cached_at: now, expires_at: now + ttl },
        );
    }

    pub fn invalidate(&self, id: &str) {
        self.entries.remove(id);
    }

    /// `floor((now - cachedAt) / 1000)` for a live entry, else `None`.
    pub fn age_seconds(&self, id: &str) -> Option<u64> {
        let now = Instant::now();
        self.entries
            .get(id)
            .filter(|e| e.expires_at > now)
            .map(|e| now.saturating_duration_since(e.cached_at).as_secs())
    }

    /// Removes every expired entry. Run from a `tokio::time::interval`
    /// sweeper every 60s, matching the teacher's pattern of spawning
    /// long-lived services (`websocket/service.rs`'s `WsService::run`).
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.expires_at <= now)
            .map(|e| e.key().clone())
            .collect();
        for id in &expired {
            self.entries.remove(id);
        }
        expired.len()
    }
}
