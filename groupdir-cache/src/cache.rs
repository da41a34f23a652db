//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::trace;

use groupdir_core::constants::DEFAULT_CACHE_TTL;
use groupdir_core::traits::Clock;
use groupdir_core::SystemClock;

/// Cache entry with its expiry timestamp.
#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL in seconds
    pub ttl_seconds: u64,
}

impl CacheConfig {
    /// TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
        }
    }
}

/// In-memory cache keyed by string.
///
/// Thread-safe. Expiry is only checked on read: a stale entry is never
/// returned and is dropped the first time it is read. There is no background
/// sweep and no capacity bound.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache with the default TTL and the wall clock.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config.ttl(), Arc::new(SystemClock))
    }

    /// Creates a cache with the given TTL and clock.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Returns the value for `key` if it has not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock: a concurrent `set` may have
        // refreshed the entry in between.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
            trace!(key, "Dropped expired cache entry");
        }
        None
    }

    /// Inserts or replaces the value for `key`.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.ttl);
    }

    /// Inserts or replaces the value for `key`, expiring after `ttl` instead
    /// of the cache's TTL.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let inserted_at = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| inserted_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries.write().insert(
            key.into(),
            CacheEntry {
                value,
                inserted_at,
                expires_at,
            },
        );
    }

    /// Returns when the entry for `key` was inserted, if it is still fresh.
    pub fn inserted_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.clock.now();
        self.entries
            .read()
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.inserted_at)
    }

    /// Returns when the entry for `key` expires, if it is still fresh.
    pub fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.clock.now();
        self.entries
            .read()
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.expires_at)
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        let now = self.clock.now();
        self.entries.write().retain(|_, e| !e.is_expired(now));
    }

    /// Returns the number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Default TTL for new entries.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
    pub ttl_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupdir_core::ManualClock;

    const TTL: Duration = Duration::from_secs(60);

    fn manual_cache() -> (TtlCache<u64>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        (TtlCache::with_clock(TTL, clock.clone()), clock)
    }

    #[test]
    fn test_cache_set_get() {
        let cache = TtlCache::new();
        cache.set("webperf", 45211u64);
        assert_eq!(cache.get("webperf"), Some(45211));
    }

    #[test]
    fn test_cache_miss() {
        let cache: TtlCache<u64> = TtlCache::new();
        assert!(cache.get("nonexistent").is_none());
    }

    #[test]
    fn test_cache_overwrite_replaces_value() {
        let (cache, _) = manual_cache();
        cache.set("webperf", 1);
        cache.set("webperf", 2);
        assert_eq!(cache.get("webperf"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_fresh_just_before_ttl() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        clock.advance(TTL - Duration::from_secs(1));
        assert_eq!(cache.get("webperf"), Some(1));
    }

    #[test]
    fn test_cache_expires_at_ttl() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        clock.advance(TTL);
        assert!(cache.get("webperf").is_none());
    }

    #[test]
    fn test_cache_lazily_drops_expired_entry() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        cache.set("css", 2);
        clock.advance(TTL * 2);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("webperf").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_refresh_restarts_ttl() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        clock.advance(TTL - Duration::from_secs(1));
        cache.set("webperf", 2);
        clock.advance(Duration::from_secs(30));
        assert_eq!(cache.get("webperf"), Some(2));
    }

    #[test]
    fn test_cache_expiry_timestamps() {
        let (cache, clock) = manual_cache();
        let start = clock.now();
        cache.set("webperf", 1);
        assert_eq!(cache.inserted_at("webperf"), Some(start));
        assert_eq!(cache.expires_at("webperf"), Some(start + TimeDelta::seconds(60)));
        clock.advance(TTL);
        assert!(cache.expires_at("webperf").is_none());
    }

    #[test]
    fn test_cache_entry_with_shorter_ttl() {
        let (cache, clock) = manual_cache();
        cache.set_with_ttl("webperf", 1, Duration::from_secs(10));
        cache.set("css", 2);

        clock.advance(Duration::from_secs(10));
        assert!(cache.get("webperf").is_none());
        assert_eq!(cache.get("css"), Some(2));
    }

    #[test]
    fn test_cache_clear() {
        let (cache, _) = manual_cache();
        cache.set("webperf", 1);
        cache.set("css", 2);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_stats() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        clock.advance(TTL);
        cache.set("css", 2);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.valid_entries, 1);
        assert_eq!(stats.ttl_seconds, 60);
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let (cache, clock) = manual_cache();
        cache.set("webperf", 1);
        clock.advance(TTL);
        cache.set("css", 2);
        cache.cleanup_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("css"), Some(2));
    }

    #[test]
    fn test_default_ttl_is_two_weeks() {
        let cache: TtlCache<u64> = TtlCache::default();
        assert_eq!(cache.ttl(), DEFAULT_CACHE_TTL);
    }
}
