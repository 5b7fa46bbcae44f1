//! `IdempotencyCache` — makes `POST /orders/batch` safe to retry.
//!
//! Same TTL-map shape as `OrderCache`, storing a frozen `(statusCode, body)`
//! pair per key instead of an order snapshot. A cached entry is returned
//! byte-identically on replay, including cached *error* responses — this is
//! the property invariant #7 and scenario S2 test.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);

struct Entry {
    status: u16,
    body: Value,
    expires_at: Instant,
}

#[derive(Default)]
pub struct IdempotencyCache {
    entries: DashMap<String, Entry>,
}

impl IdempotencyCache {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<(u16, Value)> {
        let now = Instant::now();
        let hit = self
            .entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| (e.status, e.body.clone()));
        if hit.is_none() {
            self.entries.remove(key);
        }
        hit
    }

    pub fn set(&self, key: String, status: u16, body: Value, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(DEFAULT_TTL);
        self.entries.insert(key, Entry { status, body, expires_at });
    }

    /// Removes every expired entry. Run from a sweeper every 3600s.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.expires_at <= now)
            .map(|e| e.key().clone())
            .collect();
        for key in &expired {
            self.entries.remove(key);
        }
        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn caches_error_responses_just_like_success() {
        let cache = IdempotencyCache::new();
        cache.set("k1".to_string(), 500, json!({"message": "boom"}), None);
        let (status, body) = cache.get("k1").unwrap();
        assert_eq!(status, 500);
        assert_eq!(body, json!({"message": "boom"}));
    }

    #[test]
    fn miss_on_unknown_key() {
        let cache = IdempotencyCache::new();
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let cache = IdempotencyCache::new();
        cache.set("k1".to_string(), 201, json!({}), Some(Duration::from_millis(1)));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("k1").is_none());
    }
}
