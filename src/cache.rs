//! Read-through cache capability for resolved boundaries.

use hashbrown::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Key-value cache with per-entry time-to-live.
///
/// Used purely as an optimization: a cache that never returns anything must
/// leave results unchanged.
pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V, ttl: Duration);
}

/// Cache that stores nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<V> Cache<V> for NoCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn set(&self, _key: &str, _value: V, _ttl: Duration) {}
}

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// How often `set` purges expired entries
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(120);

/// In-memory TTL cache. Last write wins; expired entries are dropped on read
/// and swept on write at most once per sweep interval.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    last_sweep: Mutex<Instant>,
    sweep_interval: Duration,
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            last_sweep: Mutex::new(Instant::now()),
            sweep_interval,
        }
    }

    fn sweep_due(&self, now: Instant) -> bool {
        match self.last_sweep.lock() {
            Ok(mut last) if now.duration_since(*last) >= self.sweep_interval => {
                *last = now;
                true
            }
            _ => false,
        }
    }

    /// Number of stored entries, including any not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> Cache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().ok()?;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict under the write lock
        if let Ok(mut entries) = self.entries.write() {
            if entries.get(key).is_some_and(|e| e.expires_at <= now) {
                entries.remove(key);
                debug!("Evicted expired cache entry {}", key);
            }
        }
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let sweep = self.sweep_due(now);

        if let Ok(mut entries) = self.entries.write() {
            if sweep {
                let before = entries.len();
                entries.retain(|_, e| e.expires_at > now);
                debug!("Swept {} expired cache entries", before - entries.len());
            }
            entries.insert(
                key.to_string(),
                Entry {
                    value,
                    expires_at: now + ttl,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_before_expiry() {
        let cache = TtlCache::new();
        cache.set("a", 1u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = TtlCache::new();
        cache.set("a", 1u32, Duration::from_secs(60));
        cache.set("a", 2u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = TtlCache::new();
        cache.set("a", 1u32, Duration::ZERO);
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_sweeps_expired_keys_never_read_again() {
        let cache = TtlCache::with_sweep_interval(Duration::ZERO);
        for i in 0..10_000 {
            cache.set(&format!("hint:{}", i), i, Duration::ZERO);
        }
        cache.set("live", 1, Duration::from_secs(60));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("live"), Some(1));
    }

    #[test]
    fn test_sweep_waits_for_interval() {
        let cache = TtlCache::with_sweep_interval(Duration::from_secs(3600));
        cache.set("a", 1u32, Duration::ZERO);
        cache.set("b", 2u32, Duration::from_secs(60));
        // Expired "a" stays until read or the next sweep
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_no_cache() {
        let cache = NoCache;
        Cache::<u32>::set(&cache, "a", 1, Duration::from_secs(60));
        assert_eq!(Cache::<u32>::get(&cache, "a"), None);
    }
}
