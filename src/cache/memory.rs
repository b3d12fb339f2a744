//! In-process TTL cache backed by `DashMap`

use super::clock::{Clock, SystemClock};
use super::SharedCache;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// Concurrent in-memory cache with per-entry TTL
///
/// Expired entries are evicted lazily on read, so `get` never hands out a
/// value past its TTL. Concurrent writers to the same key simply overwrite.
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    /// Creates an empty cache driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= now);
            tracing::trace!(key, "Evicted expired cache entry");
        }
        None
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn cache_with_clock() -> (InMemoryCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (InMemoryCache::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_set_and_get() {
        let (cache, _) = cache_with_clock();
        cache.set("k", json!("v"), Duration::from_secs(60));
        assert_eq!(cache.get("k"), Some(json!("v")));
    }

    #[test]
    fn test_missing_key() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", json!(1), Duration::from_secs(60));

        clock.advance(chrono::Duration::seconds(59));
        assert_eq!(cache.get("k"), Some(json!(1)));

        clock.advance(chrono::Duration::seconds(1));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_is_immediate() {
        let (cache, _) = cache_with_clock();
        cache.set("k", json!(1), Duration::from_secs(60));
        cache.delete("k");
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_set_overwrites_and_resets_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", json!("old"), Duration::from_secs(10));
        clock.advance(chrono::Duration::seconds(5));
        cache.set("k", json!("new"), Duration::from_secs(10));
        clock.advance(chrono::Duration::seconds(8));
        assert_eq!(cache.get("k"), Some(json!("new")));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let cache = InMemoryCache::new();
        cache.set("k", json!(true), Duration::from_secs(u64::MAX));
        assert_eq!(cache.get("k"), Some(json!(true)));
    }
}
